//! Wizard controller.
//!
//! Owns the current step and the [`ApplicationDraft`]. Moving forward off the
//! Summary step submits the application; the step only changes when the
//! backend accepts it. A failed submission leaves both the step and the draft
//! as they were and records a message for display.
//!
//! Submission can also be driven in two halves with
//! [`WizardController::begin_submission`] and
//! [`WizardController::complete_submission`], which lets the caller keep
//! editing the draft or go back while the request is outstanding.

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::Step;
use crate::gateway::{
    ApplicationGateway, ApplicationPayload, GatewayError, PayloadError, Session, SubmissionReceipt,
};
use crate::models::{ApplicationDraft, DraftPatch};

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WizardError {
    #[error("An application submission is already in progress")]
    SubmissionInFlight,

    #[error("Applications can only be submitted from the {} step", Step::SUBMIT.title())]
    NotAtSubmissionStep(Step),

    #[error(transparent)]
    Incomplete(#[from] PayloadError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

/// What the applicant sees once the backend has accepted the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompletedSubmission {
    pub receipt: SubmissionReceipt,
    pub policy_number: Option<String>,
    /// Total premium in whole rupees.
    pub total_premium: Option<Decimal>,
}

#[derive(Debug, Clone)]
pub struct WizardController {
    step: Step,
    draft: ApplicationDraft,
    error: Option<String>,
    completed: Option<CompletedSubmission>,
    in_flight: bool,
}

impl Default for WizardController {
    fn default() -> Self {
        Self::new()
    }
}

impl WizardController {
    /// Starts on the first step with an empty draft.
    pub fn new() -> Self {
        Self {
            step: Step::FIRST,
            draft: ApplicationDraft::new(),
            error: None,
            completed: None,
            in_flight: false,
        }
    }

    pub fn step(&self) -> Step {
        self.step
    }

    pub fn draft(&self) -> &ApplicationDraft {
        &self.draft
    }

    /// Message from the last failed submission, if any.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn completed(&self) -> Option<&CompletedSubmission> {
        self.completed.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight
    }

    /// Applies a step's group replacement to the draft.
    pub fn merge(
        &mut self,
        patch: DraftPatch,
    ) {
        debug!(step = self.step.number(), groups = ?patch.group_names(), "merging draft patch");
        self.draft.merge(patch);
    }

    /// Goes back one step (never before the first) and clears any error.
    pub fn retreat(&mut self) -> Step {
        self.step = self.step.previous();
        self.error = None;
        debug!(step = self.step.number(), "retreated");
        self.step
    }

    /// Goes forward one step, never past the last.
    ///
    /// On the Summary step this submits the application through `gateway`
    /// first and only moves on if the backend accepts it.
    ///
    /// # Errors
    ///
    /// * [`WizardError::SubmissionInFlight`] while a split submission is
    ///   outstanding.
    /// * [`WizardError::Incomplete`] if the draft is missing required fields.
    /// * [`WizardError::Gateway`] if the backend call fails.
    ///
    /// In every error case the step and draft are unchanged.
    pub async fn advance(
        &mut self,
        gateway: &dyn ApplicationGateway,
        session: &Session,
    ) -> Result<Step, WizardError> {
        if self.in_flight {
            return Err(WizardError::SubmissionInFlight);
        }
        if self.step != Step::SUBMIT {
            return Ok(self.step_forward());
        }

        let payload = self.prepare_payload()?;
        let result = gateway.submit_application(session, &payload).await;
        self.apply_result(result)
    }

    /// First half of a split submission: validates the draft and returns the
    /// payload to send. Until [`Self::complete_submission`] is called,
    /// `advance` is refused; `merge` and `retreat` keep working.
    pub fn begin_submission(&mut self) -> Result<ApplicationPayload, WizardError> {
        if self.in_flight {
            return Err(WizardError::SubmissionInFlight);
        }
        if self.step != Step::SUBMIT {
            return Err(WizardError::NotAtSubmissionStep(self.step));
        }

        let payload = self.prepare_payload()?;
        self.in_flight = true;
        Ok(payload)
    }

    /// Second half of a split submission. On success the wizard moves past
    /// Summary only if it is still on Summary; the receipt is kept either way.
    pub fn complete_submission(
        &mut self,
        result: Result<SubmissionReceipt, GatewayError>,
    ) -> Result<Step, WizardError> {
        self.in_flight = false;
        self.apply_result(result)
    }

    fn prepare_payload(&mut self) -> Result<ApplicationPayload, WizardError> {
        match ApplicationPayload::try_from(&self.draft) {
            Ok(payload) => {
                self.error = None;
                Ok(payload)
            }
            Err(e) => {
                warn!(error = %e, "application draft is incomplete");
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn apply_result(
        &mut self,
        result: Result<SubmissionReceipt, GatewayError>,
    ) -> Result<Step, WizardError> {
        match result {
            Ok(receipt) => {
                info!(application_id = %receipt.application_id, "application submitted");
                self.error = None;
                self.completed = Some(CompletedSubmission {
                    receipt,
                    policy_number: self.draft.policy_number.clone(),
                    total_premium: self.draft.quote.as_ref().map(|q| q.total_rupees()),
                });
                if self.step == Step::SUBMIT {
                    self.step_forward();
                }
                Ok(self.step)
            }
            Err(e) => {
                warn!(error = %e, "application submission failed");
                self.error = Some(e.to_string());
                Err(e.into())
            }
        }
    }

    fn step_forward(&mut self) -> Step {
        let next = self.step.next();
        if next == Step::LAST && self.step != Step::LAST {
            debug!("application complete, discarding draft");
            self.draft = ApplicationDraft::new();
        }
        self.step = next;
        debug!(step = self.step.number(), "advanced");
        self.step
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use async_trait::async_trait;
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::calculations::{PremiumCalculator, PremiumInput};
    use crate::models::{
        AddOn, ApplicantDetails, NoClaimBonus, PaymentMethod, PolicyCustomization,
        VehicleDetails, VehicleType,
    };

    // ── stub gateways ────────────────────────────────────────────────────

    /// Accepts every application and remembers the payloads it saw.
    #[derive(Default)]
    struct AcceptingGateway {
        calls: AtomicUsize,
        last: Mutex<Option<ApplicationPayload>>,
    }

    #[async_trait]
    impl ApplicationGateway for AcceptingGateway {
        async fn submit_application(
            &self,
            session: &Session,
            payload: &ApplicationPayload,
        ) -> Result<SubmissionReceipt, GatewayError> {
            session.authorization()?;
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last.lock().unwrap() = Some(payload.clone());
            Ok(SubmissionReceipt {
                application_id: "APP20250314101500".to_string(),
                message: "Policy application submitted successfully".to_string(),
            })
        }
    }

    /// Rejects every application with a 500.
    struct FailingGateway;

    #[async_trait]
    impl ApplicationGateway for FailingGateway {
        async fn submit_application(
            &self,
            _session: &Session,
            _payload: &ApplicationPayload,
        ) -> Result<SubmissionReceipt, GatewayError> {
            Err(GatewayError::Rejected {
                status: 500,
                message: "Failed to create application".to_string(),
            })
        }
    }

    fn session() -> Session {
        Session::new("token-123")
    }

    fn complete_patch() -> DraftPatch {
        let policy = PolicyCustomization {
            idv: Some(dec!(100000)),
            ncb: Some(NoClaimBonus::Twenty),
            addons: vec![AddOn::ZeroDepreciation],
        };
        let quote = PremiumCalculator::standard()
            .calculate(&PremiumInput::from_policy(&policy))
            .unwrap();

        DraftPatch {
            policy_number: Some("482913".to_string()),
            vehicle: Some(VehicleDetails {
                vehicle_type: Some(VehicleType::Suv),
                registration_number: "KA01MN4321".to_string(),
                make: "Tata".to_string(),
                model: "Nexon".to_string(),
                year: Some(2022),
            }),
            applicant: Some(ApplicantDetails {
                name: "Ravi Kumar".to_string(),
                mobile: "9000000001".to_string(),
                email: "ravi@example.com".to_string(),
                address: "4 Residency Road".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
            }),
            policy: Some(policy),
            quote: Some(quote),
            terms_accepted: Some(true),
            ..Default::default()
        }
    }

    /// A controller with a complete draft, parked on `step`.
    async fn controller_at(step: Step) -> WizardController {
        let mut wizard = WizardController::new();
        wizard.merge(complete_patch());
        let gateway = AcceptingGateway::default();
        while wizard.step() < step {
            wizard.advance(&gateway, &session()).await.unwrap();
        }
        wizard
    }

    // ── navigation ───────────────────────────────────────────────────────

    #[test]
    fn starts_on_first_step_with_blank_draft() {
        let wizard = WizardController::new();

        assert_eq!(wizard.step(), Step::Vehicle);
        assert_eq!(wizard.draft(), &ApplicationDraft::new());
        assert_eq!(wizard.error(), None);
    }

    #[test]
    fn retreat_clamps_at_first_step() {
        let mut wizard = WizardController::new();

        assert_eq!(wizard.retreat(), Step::Vehicle);
        assert_eq!(wizard.retreat(), Step::Vehicle);
    }

    #[tokio::test]
    async fn advance_moves_through_steps_before_summary_without_submitting() {
        let gateway = AcceptingGateway::default();
        let mut wizard = WizardController::new();

        for expected in [Step::Personal, Step::Customization, Step::Summary] {
            assert_eq!(wizard.advance(&gateway, &session()).await, Ok(expected));
        }
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn step_stays_in_range_for_any_sequence() {
        let gateway = AcceptingGateway::default();
        let mut wizard = WizardController::new();
        wizard.merge(complete_patch());

        // forward-heavy and back-heavy runs, interleaved
        let moves = "ffbffffffffbbbbbbbbbfbfbffffffffbbffff";
        for m in moves.chars() {
            if m == 'f' {
                let _ = wizard.advance(&gateway, &session()).await;
            } else {
                wizard.retreat();
            }
            let n = wizard.step().number();
            assert!((1..=6).contains(&n), "step {n} out of range");
        }
    }

    #[tokio::test]
    async fn advance_clamps_at_last_step() {
        let gateway = AcceptingGateway::default();
        let mut wizard = controller_at(Step::Success).await;

        assert_eq!(wizard.advance(&gateway, &session()).await, Ok(Step::Success));
    }

    // ── merge ────────────────────────────────────────────────────────────

    #[test]
    fn merge_preserves_fields_not_in_patch() {
        let mut wizard = WizardController::new();
        wizard.merge(complete_patch());

        wizard.merge(DraftPatch {
            payment_method: Some(PaymentMethod::Upi),
            ..Default::default()
        });

        let draft = wizard.draft();
        assert_eq!(draft.vehicle.make, "Tata");
        assert_eq!(draft.applicant.city, "Bengaluru");
        assert_eq!(draft.policy.idv, Some(dec!(100000)));
        assert_eq!(draft.payment_method, Some(PaymentMethod::Upi));
    }

    // ── submission ───────────────────────────────────────────────────────

    #[tokio::test]
    async fn advance_from_summary_submits_and_moves_to_payment() {
        let gateway = AcceptingGateway::default();
        let mut wizard = controller_at(Step::Summary).await;

        let step = wizard.advance(&gateway, &session()).await;

        assert_eq!(step, Ok(Step::Payment));
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 1);
        let sent = gateway.last.lock().unwrap().clone().unwrap();
        assert_eq!(sent.registration_number, "KA01MN4321");
        assert_eq!(sent.policy_annual_premium, 3257);

        let completed = wizard.completed().unwrap();
        assert_eq!(completed.receipt.application_id, "APP20250314101500");
        assert_eq!(completed.policy_number.as_deref(), Some("482913"));
        assert_eq!(completed.total_premium, Some(dec!(3257)));
    }

    #[tokio::test]
    async fn failed_submission_keeps_step_and_draft() {
        let mut wizard = controller_at(Step::Summary).await;
        let before = wizard.draft().clone();

        let result = wizard.advance(&FailingGateway, &session()).await;

        assert!(matches!(result, Err(WizardError::Gateway(_))));
        assert_eq!(wizard.step(), Step::Summary);
        assert_eq!(wizard.draft(), &before);
        assert_eq!(
            wizard.error(),
            Some("Request rejected (500): Failed to create application")
        );
        assert!(wizard.completed().is_none());
    }

    #[tokio::test]
    async fn missing_token_blocks_submission() {
        let gateway = AcceptingGateway::default();
        let mut wizard = controller_at(Step::Summary).await;

        let result = wizard.advance(&gateway, &Session::default()).await;

        assert_eq!(
            result,
            Err(WizardError::Gateway(GatewayError::Unauthenticated))
        );
        assert_eq!(wizard.step(), Step::Summary);
        assert_eq!(wizard.error(), Some("Authentication token not found"));
    }

    #[tokio::test]
    async fn incomplete_draft_is_not_sent() {
        let gateway = AcceptingGateway::default();
        let mut wizard = WizardController::new();
        for _ in 0..3 {
            wizard.advance(&gateway, &session()).await.unwrap();
        }

        let result = wizard.advance(&gateway, &session()).await;

        assert!(matches!(result, Err(WizardError::Incomplete(_))));
        assert_eq!(wizard.step(), Step::Summary);
        assert_eq!(gateway.calls.load(Ordering::SeqCst), 0);
        assert!(wizard.error().unwrap().starts_with("Missing required field(s): vehicleType"));
    }

    #[tokio::test]
    async fn retry_after_failure_succeeds_and_clears_error() {
        let gateway = AcceptingGateway::default();
        let mut wizard = controller_at(Step::Summary).await;
        let _ = wizard.advance(&FailingGateway, &session()).await;

        let step = wizard.advance(&gateway, &session()).await;

        assert_eq!(step, Ok(Step::Payment));
        assert_eq!(wizard.error(), None);
    }

    #[tokio::test]
    async fn retreat_clears_error() {
        let mut wizard = controller_at(Step::Summary).await;
        let _ = wizard.advance(&FailingGateway, &session()).await;

        wizard.retreat();

        assert_eq!(wizard.error(), None);
        assert_eq!(wizard.step(), Step::Customization);
    }

    #[tokio::test]
    async fn reaching_success_discards_draft_and_keeps_receipt() {
        let wizard = controller_at(Step::Success).await;

        assert_eq!(wizard.draft(), &ApplicationDraft::new());
        assert!(wizard.completed().is_some());
    }

    // ── split submission ─────────────────────────────────────────────────

    #[tokio::test]
    async fn in_flight_submission_blocks_advance_but_not_edits() {
        let gateway = AcceptingGateway::default();
        let mut wizard = controller_at(Step::Summary).await;

        let payload = wizard.begin_submission().unwrap();
        assert!(wizard.is_submitting());
        assert_eq!(payload.name, "Ravi Kumar");

        assert_eq!(
            wizard.advance(&gateway, &session()).await,
            Err(WizardError::SubmissionInFlight)
        );
        assert_eq!(wizard.begin_submission(), Err(WizardError::SubmissionInFlight));

        wizard.merge(DraftPatch {
            terms_accepted: Some(false),
            ..Default::default()
        });
        assert!(!wizard.draft().terms_accepted);
    }

    #[tokio::test]
    async fn complete_submission_advances_when_still_on_summary() {
        let mut wizard = controller_at(Step::Summary).await;
        wizard.begin_submission().unwrap();

        let step = wizard.complete_submission(Ok(SubmissionReceipt {
            application_id: "APP1".to_string(),
            message: String::new(),
        }));

        assert_eq!(step, Ok(Step::Payment));
        assert!(!wizard.is_submitting());
    }

    #[tokio::test]
    async fn complete_submission_after_retreat_keeps_current_step() {
        let mut wizard = controller_at(Step::Summary).await;
        wizard.begin_submission().unwrap();
        wizard.retreat();

        let step = wizard.complete_submission(Ok(SubmissionReceipt {
            application_id: "APP1".to_string(),
            message: String::new(),
        }));

        assert_eq!(step, Ok(Step::Customization));
        assert_eq!(wizard.completed().unwrap().receipt.application_id, "APP1");
    }

    #[tokio::test]
    async fn complete_submission_failure_unblocks_advance() {
        let mut wizard = controller_at(Step::Summary).await;
        wizard.begin_submission().unwrap();

        let result = wizard.complete_submission(Err(GatewayError::Transport(
            "connection refused".to_string(),
        )));

        assert!(result.is_err());
        assert!(!wizard.is_submitting());
        assert_eq!(
            wizard.error(),
            Some("Could not reach the server: connection refused")
        );
        assert_eq!(wizard.step(), Step::Summary);
    }

    #[test]
    fn begin_submission_outside_summary_is_refused() {
        let mut wizard = WizardController::new();

        assert_eq!(
            wizard.begin_submission(),
            Err(WizardError::NotAtSubmissionStep(Step::Vehicle))
        );
    }
}
