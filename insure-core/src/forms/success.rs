use super::format::opt_rupees_display;
use super::{DisplayRow, FormError, StepContext, StepForm, StepView, unknown_field};
use crate::models::{ApplicationDraft, DraftPatch};
use crate::wizard::Step;

/// Receipt for the accepted application. Has no inputs.
#[derive(Debug, Clone, Default)]
pub struct SuccessView;

impl SuccessView {
    pub fn new() -> Self {
        Self
    }
}

impl StepView for SuccessView {
    fn step(&self) -> Step {
        Step::Success
    }

    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm {
        let form = StepForm::new(Step::Success);
        let Some(done) = ctx.completed else {
            return form;
        };

        let mut rows = vec![
            DisplayRow::new("Application ID", &done.receipt.application_id),
            DisplayRow::new("Policy Number", done.policy_number.as_deref().unwrap_or("—")),
            DisplayRow::new("Total Premium", opt_rupees_display(done.total_premium)),
        ];
        if !done.receipt.message.is_empty() {
            rows.push(DisplayRow::new("Status", &done.receipt.message));
        }
        form.section("Application Submitted", rows)
    }

    fn edit(
        &mut self,
        _draft: &ApplicationDraft,
        key: &str,
        _value: &str,
    ) -> Result<DraftPatch, FormError> {
        Err(unknown_field(Step::Success, key))
    }
}
