//! Seams to the external policy backend.
//!
//! The wizard only talks to the backend through [`ApplicationGateway`]; the
//! document tools use [`DocumentGateway`]. `insure-http` provides the
//! `reqwest` implementation of both.

mod config;
mod payload;
mod session;

use async_trait::async_trait;
use thiserror::Error;

pub use config::ApiConfig;
pub use payload::{ApplicationPayload, PayloadError, SubmissionReceipt};
pub use session::Session;

use crate::models::{DocumentKind, DocumentScore, DocumentUpload};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Authentication token not found")]
    Unauthenticated,

    #[error("Request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Could not reach the server: {0}")]
    Transport(String),

    #[error("Unexpected response from the server: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait ApplicationGateway: Send + Sync {
    /// Sends a completed application. Succeeds only on a 2xx response.
    async fn submit_application(
        &self,
        session: &Session,
        payload: &ApplicationPayload,
    ) -> Result<SubmissionReceipt, GatewayError>;
}

#[async_trait]
pub trait DocumentGateway: Send + Sync {
    /// Uploads a document for forgery scoring.
    async fn score_document(
        &self,
        session: &Session,
        upload: &DocumentUpload,
    ) -> Result<DocumentScore, GatewayError>;

    /// Uploads a policy or claim document for OCR extraction and returns the
    /// structured fields the extractor found.
    async fn extract_document(
        &self,
        kind: DocumentKind,
        upload: &DocumentUpload,
    ) -> Result<serde_json::Value, GatewayError>;

    /// Posts reviewed extraction fields back to the backend's record for
    /// `kind`. Any non-2xx status is a rejection.
    async fn update_document(
        &self,
        kind: DocumentKind,
        fields: &serde_json::Value,
    ) -> Result<(), GatewayError>;
}
