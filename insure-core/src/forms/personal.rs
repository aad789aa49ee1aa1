use super::{FieldKind, FormError, FormField, StepContext, StepForm, StepView, unknown_field};
use crate::models::{ApplicationDraft, DraftPatch};
use crate::wizard::Step;

#[derive(Debug, Clone, Default)]
pub struct PersonalView;

impl PersonalView {
    pub fn new() -> Self {
        Self
    }
}

impl StepView for PersonalView {
    fn step(&self) -> Step {
        Step::Personal
    }

    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm {
        let a = &ctx.draft.applicant;

        StepForm::new(Step::Personal)
            .field(FormField::text("name", "Full Name", &a.name).required())
            .field(
                FormField::text("mobile", "Mobile Number", &a.mobile)
                    .with_kind(FieldKind::Phone)
                    .required(),
            )
            .field(
                FormField::text("email", "Email", &a.email)
                    .with_kind(FieldKind::Email)
                    .required(),
            )
            .field(FormField::text("address", "Address", &a.address).required())
            .field(FormField::text("city", "City", &a.city).required())
            .field(FormField::text("state", "State", &a.state).required())
    }

    fn edit(
        &mut self,
        draft: &ApplicationDraft,
        key: &str,
        value: &str,
    ) -> Result<DraftPatch, FormError> {
        let mut applicant = draft.applicant.clone();
        let slot = match key {
            "name" => &mut applicant.name,
            "mobile" => &mut applicant.mobile,
            "email" => &mut applicant.email,
            "address" => &mut applicant.address,
            "city" => &mut applicant.city,
            "state" => &mut applicant.state,
            _ => return Err(unknown_field(Step::Personal, key)),
        };
        *slot = value.to_string();

        Ok(DraftPatch::applicant(applicant))
    }
}
