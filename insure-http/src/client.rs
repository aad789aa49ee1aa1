use async_trait::async_trait;
use insure_core::gateway::{ApiConfig, ApplicationPayload, SubmissionReceipt};
use insure_core::{
    ApplicationGateway, DocumentGateway, DocumentKind, DocumentScore, DocumentUpload,
    GatewayError, Session,
};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info, warn};

/// Talks to the policy backend over HTTP.
pub struct HttpGateway {
    client: Client,
    config: ApiConfig,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: Option<String>,
    message: Option<String>,
}

impl HttpGateway {
    pub fn new(config: &ApiConfig) -> Result<Self, GatewayError> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }
        let client = builder
            .build()
            .map_err(|e| GatewayError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            config: config.clone(),
        })
    }

    pub fn with_client(
        client: Client,
        config: &ApiConfig,
    ) -> Self {
        Self {
            client,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    fn file_form(upload: &DocumentUpload) -> Result<Form, GatewayError> {
        let part = Part::bytes(upload.bytes.clone())
            .file_name(upload.file_name.clone())
            .mime_str(&upload.content_type)
            .map_err(|e| GatewayError::InvalidResponse(format!("bad content type: {e}")))?;
        Ok(Form::new().part("file", part))
    }

    async fn send(
        &self,
        request: RequestBuilder,
    ) -> Result<Response, GatewayError> {
        request.send().await.map_err(|e| {
            warn!(error = %e, "request failed");
            GatewayError::Transport(e.to_string())
        })
    }
}

/// Builds the rejection for a non-success response, preferring the body's
/// `error` field over its raw text.
async fn rejection(response: Response) -> GatewayError {
    let status = response.status();
    let body = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<ErrorBody>(&body)
        .ok()
        .and_then(|b| b.error.or(b.message))
        .filter(|m| !m.trim().is_empty())
        .or_else(|| Some(body.trim().to_string()).filter(|b| !b.is_empty()))
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("Unknown error")
                .to_string()
        });

    GatewayError::Rejected {
        status: status.as_u16(),
        message,
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, GatewayError> {
    response
        .json()
        .await
        .map_err(|e| GatewayError::InvalidResponse(e.to_string()))
}

#[async_trait]
impl ApplicationGateway for HttpGateway {
    async fn submit_application(
        &self,
        session: &Session,
        payload: &ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError> {
        let authorization = session.authorization()?;
        let url = self.config.endpoint("apply/new");
        debug!(%url, policy_number = ?payload.policy_number, "submitting application");

        let response = self
            .send(
                self.client
                    .post(&url)
                    .header(reqwest::header::AUTHORIZATION, authorization)
                    .json(payload),
            )
            .await?;

        match response.status() {
            StatusCode::OK | StatusCode::CREATED => {
                let receipt: SubmissionReceipt = read_json(response).await?;
                info!(application_id = %receipt.application_id, "application accepted");
                Ok(receipt)
            }
            _ => {
                let err = rejection(response).await;
                warn!(error = %err, "application rejected");
                Err(err)
            }
        }
    }
}

#[async_trait]
impl DocumentGateway for HttpGateway {
    async fn score_document(
        &self,
        session: &Session,
        upload: &DocumentUpload,
    ) -> Result<DocumentScore, GatewayError> {
        let authorization = session.authorization()?;
        let url = self.config.endpoint("docs/upload");
        debug!(%url, ?upload, "uploading document for scoring");

        let response = self
            .send(
                self.client
                    .post(&url)
                    .header(reqwest::header::AUTHORIZATION, authorization)
                    .multipart(Self::file_form(upload)?),
            )
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let mut score: DocumentScore = read_json(response).await?;
        if score.file_name.is_empty() {
            score.file_name = upload.file_name.clone();
        }
        info!(label = %score.predicted_label, confidence = score.confidence, "document scored");
        Ok(score)
    }

    async fn extract_document(
        &self,
        kind: DocumentKind,
        upload: &DocumentUpload,
    ) -> Result<serde_json::Value, GatewayError> {
        let url = self
            .config
            .endpoint(&format!("ocr/extract_{}", kind.as_str()));
        debug!(%url, ?upload, "uploading document for extraction");

        let response = self
            .send(self.client.post(&url).multipart(Self::file_form(upload)?))
            .await?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        read_json(response).await
    }

    async fn update_document(
        &self,
        kind: DocumentKind,
        fields: &serde_json::Value,
    ) -> Result<(), GatewayError> {
        let url = self.config.endpoint(&format!("update_{}", kind.as_str()));
        debug!(%url, "submitting reviewed document fields");

        let response = self.send(self.client.post(&url).json(fields)).await?;

        if !response.status().is_success() {
            let err = rejection(response).await;
            warn!(error = %err, "document update rejected");
            return Err(err);
        }
        info!(kind = kind.as_str(), "document fields updated");
        Ok(())
    }
}
