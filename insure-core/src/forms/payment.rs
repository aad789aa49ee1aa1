use super::format::format_rupees;
use super::{
    Choice, DisplayRow, FieldKind, FieldValue, FormError, FormField, StepContext, StepForm,
    StepView, unknown_field,
};
use crate::models::{ApplicationDraft, DraftPatch, PaymentMethod};
use crate::wizard::Step;

/// Amount due and payment method selection. No payment is processed here.
#[derive(Debug, Clone, Default)]
pub struct PaymentView;

impl PaymentView {
    pub fn new() -> Self {
        Self
    }
}

impl StepView for PaymentView {
    fn step(&self) -> Step {
        Step::Payment
    }

    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm {
        let draft = ctx.draft;
        let amount = draft
            .quote
            .as_ref()
            .map(|q| format_rupees(q.total))
            .unwrap_or_else(|| "—".to_string());
        let methods = PaymentMethod::all()
            .iter()
            .map(|m| Choice::new(m.as_str(), m.label()))
            .collect();

        StepForm::new(Step::Payment)
            .section("Payment", vec![DisplayRow::new("Amount to Pay", amount)])
            .field(
                FormField::new(
                    "paymentMethod",
                    "Payment Method",
                    FieldKind::Select(methods),
                    FieldValue::Text(
                        draft.payment_method.map(|m| m.as_str()).unwrap_or_default().to_string(),
                    ),
                )
                .required(),
            )
    }

    fn edit(
        &mut self,
        _draft: &ApplicationDraft,
        key: &str,
        value: &str,
    ) -> Result<DraftPatch, FormError> {
        if key != "paymentMethod" {
            return Err(unknown_field(Step::Payment, key));
        }
        let method = PaymentMethod::parse(value.trim()).ok_or_else(|| FormError::InvalidChoice {
            label: "Payment Method",
            value: value.to_string(),
        })?;

        Ok(DraftPatch {
            payment_method: Some(method),
            ..Default::default()
        })
    }
}
