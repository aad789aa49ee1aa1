use httpmock::prelude::*;
use insure_core::calculations::{PremiumCalculator, PremiumInput};
use insure_core::gateway::{ApiConfig, ApplicationPayload};
use insure_core::{
    AddOn, ApplicantDetails, ApplicationDraft, ApplicationGateway, DocumentGateway, DocumentKind,
    DocumentUpload, DraftPatch, GatewayError, NoClaimBonus, PolicyCustomization, Session,
    VehicleDetails, VehicleType,
};
use insure_http::HttpGateway;
use pretty_assertions::assert_eq;
use rust_decimal_macros::dec;
use serde_json::json;

fn gateway(server: &MockServer) -> HttpGateway {
    HttpGateway::new(&ApiConfig::new(server.base_url())).unwrap()
}

fn session() -> Session {
    Session::new("token-abc")
}

fn payload() -> ApplicationPayload {
    let policy = PolicyCustomization {
        idv: Some(dec!(100000)),
        ncb: Some(NoClaimBonus::Twenty),
        addons: vec![AddOn::ZeroDepreciation],
    };
    let quote = PremiumCalculator::standard()
        .calculate(&PremiumInput::from_policy(&policy))
        .unwrap();

    let mut draft = ApplicationDraft::new();
    draft.merge(DraftPatch {
        policy_number: Some("482913".to_string()),
        vehicle: Some(VehicleDetails {
            vehicle_type: Some(VehicleType::Car),
            registration_number: "MH12AB1234".to_string(),
            make: "Maruti".to_string(),
            model: "Swift".to_string(),
            year: Some(2021),
        }),
        applicant: Some(ApplicantDetails {
            name: "Asha Rao".to_string(),
            mobile: "9876543210".to_string(),
            email: "asha@example.com".to_string(),
            address: "12 MG Road".to_string(),
            city: "Pune".to_string(),
            state: "Maharashtra".to_string(),
        }),
        policy: Some(policy),
        quote: Some(quote),
        ..Default::default()
    });
    ApplicationPayload::try_from(&draft).unwrap()
}

// ── submit_application ───────────────────────────────────────────────────

#[tokio::test]
async fn submit_posts_json_with_bearer_token() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/apply/new")
                .header("authorization", "Bearer token-abc")
                .json_body(json!({
                    "policy_number": "482913",
                    "vehicleType": "car",
                    "registrationNumber": "MH12AB1234",
                    "make": "Maruti",
                    "model": "Swift",
                    "year": "2021",
                    "name": "Asha Rao",
                    "mobile": "9876543210",
                    "email": "asha@example.com",
                    "address": "12 MG Road",
                    "city": "Pune",
                    "state": "Maharashtra",
                    "idv": "100000",
                    "ncb": "20",
                    "addons": ["Zero Depreciation"],
                    "policy_annual_premium": 3257,
                    "umbrella_limit": 1000000,
                    "policy_csl": 800000,
                    "total_insurance_amount": 900000
                }));
            then.status(201).json_body(json!({
                "message": "Policy application submitted successfully",
                "application_id": "APP20250314101500"
            }));
        })
        .await;

    let receipt = gateway(&server)
        .submit_application(&session(), &payload())
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(receipt.application_id, "APP20250314101500");
    assert_eq!(receipt.message, "Policy application submitted successfully");
}

#[tokio::test]
async fn submit_accepts_plain_ok() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/apply/new");
            then.status(200)
                .json_body(json!({ "application_id": "APP1" }));
        })
        .await;

    let receipt = gateway(&server)
        .submit_application(&session(), &payload())
        .await
        .unwrap();

    assert_eq!(receipt.application_id, "APP1");
}

#[tokio::test]
async fn submit_other_success_status_is_rejected() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/apply/new");
            then.status(202).json_body(json!({ "application_id": "APP1" }));
        })
        .await;

    let result = gateway(&server)
        .submit_application(&session(), &payload())
        .await;

    assert!(matches!(result, Err(GatewayError::Rejected { status: 202, .. })));
}

#[tokio::test]
async fn submit_reports_error_field_from_body() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/apply/new");
            then.status(401)
                .json_body(json!({ "error": "Token is invalid!" }));
        })
        .await;

    let result = gateway(&server)
        .submit_application(&session(), &payload())
        .await;

    assert_eq!(
        result,
        Err(GatewayError::Rejected {
            status: 401,
            message: "Token is invalid!".to_string(),
        })
    );
}

#[tokio::test]
async fn submit_falls_back_to_status_reason() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/apply/new");
            then.status(500);
        })
        .await;

    let err = gateway(&server)
        .submit_application(&session(), &payload())
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Request rejected (500): Internal Server Error");
}

#[tokio::test]
async fn submit_without_token_makes_no_request() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST).path("/apply/new");
            then.status(201).json_body(json!({ "application_id": "APP1" }));
        })
        .await;

    let result = gateway(&server)
        .submit_application(&Session::default(), &payload())
        .await;

    assert_eq!(result, Err(GatewayError::Unauthenticated));
    assert_eq!(mock.hits_async().await, 0);
}

#[tokio::test]
async fn submit_with_malformed_body_is_invalid_response() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/apply/new");
            then.status(201)
                .header("content-type", "application/json")
                .body("not json");
        })
        .await;

    let result = gateway(&server)
        .submit_application(&session(), &payload())
        .await;

    assert!(matches!(result, Err(GatewayError::InvalidResponse(_))));
}

#[tokio::test]
async fn unreachable_server_is_transport_error() {
    let gateway = HttpGateway::new(&ApiConfig::new("http://127.0.0.1:1")).unwrap();

    let result = gateway.submit_application(&session(), &payload()).await;

    assert!(matches!(result, Err(GatewayError::Transport(_))));
}

// ── documents ────────────────────────────────────────────────────────────

#[tokio::test]
async fn score_document_uploads_file_part() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/docs/upload")
                .header("authorization", "Bearer token-abc")
                .body_contains("name=\"file\"")
                .body_contains("filename=\"rc.png\"");
            then.status(200).json_body(json!({
                "predicted_label": "Real",
                "confidence": 0.93,
                "full_confidence": [[0.07, 0.93]],
                "file_name": "rc.png"
            }));
        })
        .await;

    let upload = DocumentUpload::new("rc.png", vec![0x89, b'P', b'N', b'G']);
    let score = gateway(&server)
        .score_document(&session(), &upload)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(score.predicted_label, "Real");
    assert_eq!(score.file_name, "rc.png");
    assert!((score.confidence - 0.93).abs() < f64::EPSILON);
}

#[tokio::test]
async fn score_document_requires_token() {
    let server = MockServer::start_async().await;

    let upload = DocumentUpload::new("rc.png", vec![1, 2, 3]);
    let result = gateway(&server)
        .score_document(&Session::new(""), &upload)
        .await;

    assert_eq!(result, Err(GatewayError::Unauthenticated));
}

#[tokio::test]
async fn extract_document_hits_kind_specific_endpoint() {
    let server = MockServer::start_async().await;
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/ocr/extract_claim")
                .body_contains("name=\"file\"");
            then.status(200).json_body(json!({
                "claim_number": "CLM-1001",
                "amount": 45000
            }));
        })
        .await;

    let upload = DocumentUpload::new("claim.pdf", b"%PDF-1.7".to_vec());
    let fields = gateway(&server)
        .extract_document(DocumentKind::Claim, &upload)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(fields["claim_number"], "CLM-1001");
    assert_eq!(fields["amount"], 45000);
}

#[tokio::test]
async fn extract_document_reports_missing_file_error() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/ocr/extract_policy");
            then.status(400).json_body(json!({ "error": "No file uploaded" }));
        })
        .await;

    let upload = DocumentUpload::new("policy.jpg", vec![]);
    let err = gateway(&server)
        .extract_document(DocumentKind::Policy, &upload)
        .await
        .unwrap_err();

    assert_eq!(err.to_string(), "Request rejected (400): No file uploaded");
}

// ── update_document ──────────────────────────────────────────────────────

#[tokio::test]
async fn update_document_posts_reviewed_fields() {
    let server = MockServer::start_async().await;
    let fields = json!({ "policy_number": "482913", "insured_name": "Asha Rao" });
    let mock = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/update_policy")
                .header("content-type", "application/json")
                .json_body(fields.clone());
            then.status(200).json_body(json!({ "message": "updated" }));
        })
        .await;

    let result = gateway(&server)
        .update_document(DocumentKind::Policy, &fields)
        .await;

    mock.assert_async().await;
    assert_eq!(result, Ok(()));
}

#[tokio::test]
async fn update_document_rejects_non_success_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(POST).path("/update_claim");
            then.status(404).json_body(json!({ "error": "Claim not found" }));
        })
        .await;

    let result = gateway(&server)
        .update_document(DocumentKind::Claim, &json!({ "claim_number": "CLM-9" }))
        .await;

    assert_eq!(
        result,
        Err(GatewayError::Rejected {
            status: 404,
            message: "Claim not found".to_string(),
        })
    );
}
