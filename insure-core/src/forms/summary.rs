use super::format::{format_amount, format_rupees, opt_rupees_display};
use super::{
    DisplayRow, FieldKind, FieldValue, FormError, FormField, StepContext, StepForm, StepView,
    unknown_field,
};
use crate::models::{AddOn, ApplicationDraft, DraftPatch};
use crate::wizard::Step;

pub(crate) const TERMS_LABEL: &str = "I agree to the terms and conditions";

/// Read-only recap of the draft with the premium breakdown and the terms
/// acknowledgement. Leaving this step submits the application.
#[derive(Debug, Clone, Default)]
pub struct SummaryView;

impl SummaryView {
    pub fn new() -> Self {
        Self
    }
}

fn or_dash(value: &str) -> String {
    if value.trim().is_empty() { "—".to_string() } else { value.to_string() }
}

impl StepView for SummaryView {
    fn step(&self) -> Step {
        Step::Summary
    }

    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm {
        let draft = ctx.draft;
        let v = &draft.vehicle;
        let a = &draft.applicant;
        let p = &draft.policy;

        let addons = if p.addons.is_empty() {
            "None".to_string()
        } else {
            p.addons.iter().map(AddOn::label).collect::<Vec<_>>().join(", ")
        };

        let mut form = StepForm::new(Step::Summary)
            .section(
                "Vehicle Details",
                vec![
                    DisplayRow::new(
                        "Vehicle Type",
                        v.vehicle_type.map(|t| t.label()).unwrap_or("—"),
                    ),
                    DisplayRow::new("Registration Number", or_dash(&v.registration_number)),
                    DisplayRow::new("Make & Model", or_dash(&v.make_and_model())),
                    DisplayRow::new(
                        "Year",
                        v.year.map(|y| y.to_string()).unwrap_or_else(|| "—".to_string()),
                    ),
                ],
            )
            .section(
                "Personal Information",
                vec![
                    DisplayRow::new("Name", or_dash(&a.name)),
                    DisplayRow::new("Mobile", or_dash(&a.mobile)),
                    DisplayRow::new("Email", or_dash(&a.email)),
                    DisplayRow::new(
                        "Address",
                        or_dash(
                            &[a.address.trim(), a.city.trim(), a.state.trim()]
                                .iter()
                                .filter(|s| !s.is_empty())
                                .copied()
                                .collect::<Vec<_>>()
                                .join(", "),
                        ),
                    ),
                ],
            )
            .section(
                "Policy Details",
                vec![
                    DisplayRow::new("Policy Number", draft.policy_number.as_deref().unwrap_or("—")),
                    DisplayRow::new("IDV", opt_rupees_display(p.idv)),
                    DisplayRow::new(
                        "No Claim Bonus",
                        p.ncb.map(|n| n.to_string()).unwrap_or_else(|| "—".to_string()),
                    ),
                    DisplayRow::new("Add-ons", addons),
                ],
            );

        if let Some(quote) = &draft.quote {
            form = form.section(
                "Premium Breakdown",
                vec![
                    DisplayRow::new("Basic Premium", format_amount(quote.basic_premium)),
                    DisplayRow::new("Add-ons", format_amount(quote.addon_premium)),
                    DisplayRow::new("GST (18%)", format_amount(quote.tax)),
                    DisplayRow::new("Total Premium", format_rupees(quote.total)),
                ],
            );
        }

        form.field(
            FormField::new(
                "terms",
                TERMS_LABEL,
                FieldKind::Checkbox,
                FieldValue::Checked(draft.terms_accepted),
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
        if key != "terms" {
            return Err(unknown_field(Step::Summary, key));
        }
        let accepted = parse_flag(value).ok_or_else(|| FormError::InvalidChoice {
            label: "terms",
            value: value.to_string(),
        })?;

        Ok(DraftPatch {
            terms_accepted: Some(accepted),
            ..Default::default()
        })
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "yes" | "y" | "1" | "on" => Some(true),
        "false" | "no" | "n" | "0" | "off" | "" => Some(false),
        _ => None,
    }
}
