use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::debug;

use super::format::{format_amount, format_rupees, parse_optional_amount};
use super::{
    Choice, DisplayRow, FieldKind, FieldValue, FormError, FormField, StepContext, StepForm,
    StepView, unknown_field,
};
use crate::calculations::{MemoizedPremium, PremiumInput};
use crate::models::{AddOn, ApplicationDraft, DraftPatch, NoClaimBonus};
use crate::wizard::Step;

/// Policy customization: IDV, no-claim bonus and add-ons, with a live
/// premium breakdown.
///
/// Every edit reprices the policy and sends the new quote along with the
/// policy group. Pricing goes through a [`MemoizedPremium`], so an edit that
/// leaves the inputs unchanged reuses the previous quote.
#[derive(Debug)]
pub struct CustomizationView {
    premium: MemoizedPremium,
    rng: StdRng,
}

impl Default for CustomizationView {
    fn default() -> Self {
        Self::new()
    }
}

impl CustomizationView {
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    pub fn with_rng(rng: StdRng) -> Self {
        Self {
            premium: MemoizedPremium::default(),
            rng,
        }
    }

    /// Number of quotes actually computed so far.
    pub fn computations(&self) -> usize {
        self.premium.computations()
    }

    fn policy_number(&mut self) -> String {
        self.rng.gen_range(100_000..1_000_000).to_string()
    }
}

impl StepView for CustomizationView {
    fn step(&self) -> Step {
        Step::Customization
    }

    fn render(
        &self,
        ctx: &StepContext<'_>,
    ) -> StepForm {
        let draft = ctx.draft;
        let policy = &draft.policy;
        let ncb_choices = NoClaimBonus::all()
            .iter()
            .map(|n| Choice::new(n.percent().to_string(), n.to_string()))
            .collect();
        let addon_choices = AddOn::all()
            .iter()
            .map(|a| Choice::new(a.label(), a.label()))
            .collect();

        let quote = draft.quote.clone().unwrap_or_default();

        StepForm::new(Step::Customization)
            .section(
                "Policy",
                vec![DisplayRow::new(
                    "Policy Number",
                    draft.policy_number.clone().unwrap_or_else(|| "—".to_string()),
                )],
            )
            .field(
                FormField::new(
                    "idv",
                    "Insured Declared Value (IDV)",
                    FieldKind::Amount,
                    FieldValue::Text(policy.idv.map(|v| v.normalize().to_string()).unwrap_or_default()),
                )
                .required(),
            )
            .field(
                FormField::new(
                    "ncb",
                    "No Claim Bonus",
                    FieldKind::Select(ncb_choices),
                    FieldValue::Text(policy.ncb.map(|n| n.percent().to_string()).unwrap_or_default()),
                )
                .required(),
            )
            .field(FormField::new(
                "addons",
                "Add-ons",
                FieldKind::MultiSelect(addon_choices),
                FieldValue::Selected(policy.addons.iter().map(|a| a.label().to_string()).collect()),
            ))
            .section(
                "Premium Breakdown",
                vec![
                    DisplayRow::new("Basic Premium", format_amount(quote.basic_premium)),
                    DisplayRow::new("Add-ons", format_amount(quote.addon_premium)),
                    DisplayRow::new("GST (18%)", format_amount(quote.tax)),
                    DisplayRow::new("Total Premium", format_rupees(quote.total)),
                ],
            )
            .section(
                "Coverage",
                vec![
                    DisplayRow::new(
                        "Policy Annual Premium",
                        format_rupees(quote.coverage.policy_annual_premium),
                    ),
                    DisplayRow::new("Umbrella Limit", format_rupees(quote.coverage.umbrella_limit)),
                    DisplayRow::new("Policy CSL", format_rupees(quote.coverage.policy_csl)),
                    DisplayRow::new(
                        "Total Insurance Amount",
                        format_rupees(quote.coverage.total_insurance_amount),
                    ),
                ],
            )
    }

    fn edit(
        &mut self,
        draft: &ApplicationDraft,
        key: &str,
        value: &str,
    ) -> Result<DraftPatch, FormError> {
        let mut policy = draft.policy.clone();
        let trimmed = value.trim();

        match key {
            "idv" => {
                let idv = parse_optional_amount(value).map_err(|_| FormError::InvalidNumber {
                    label: "Insured Declared Value (IDV)",
                    value: value.to_string(),
                })?;
                policy.idv = idv.map(|v| v.normalize());
            }
            "ncb" if trimmed.is_empty() => policy.ncb = None,
            "ncb" => {
                policy.ncb = Some(NoClaimBonus::parse(trimmed).ok_or_else(|| {
                    FormError::InvalidChoice {
                        label: "No Claim Bonus",
                        value: value.to_string(),
                    }
                })?);
            }
            "addons" => {
                let addon = AddOn::parse(trimmed).ok_or_else(|| FormError::InvalidChoice {
                    label: "Add-ons",
                    value: value.to_string(),
                })?;
                policy.toggle_addon(addon);
            }
            _ => return Err(unknown_field(Step::Customization, key)),
        }

        let quote = self.premium.quote(&PremiumInput::from_policy(&policy))?;
        debug!(total = %quote.total, computations = self.premium.computations(), "policy repriced");

        Ok(DraftPatch {
            policy_number: self.enter(draft).and_then(|p| p.policy_number),
            policy: Some(policy),
            quote: Some(quote),
            ..Default::default()
        })
    }

    /// Assigns a six-digit policy number the first time the step is shown.
    fn enter(
        &mut self,
        draft: &ApplicationDraft,
    ) -> Option<DraftPatch> {
        if draft.policy_number.is_some() {
            return None;
        }
        Some(DraftPatch {
            policy_number: Some(self.policy_number()),
            ..Default::default()
        })
    }
}
