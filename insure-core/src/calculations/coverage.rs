//! Coverage terms derived from the insured declared value.
//!
//! | Term | Rule |
//! |------|------|
//! | Annual premium | Quote total, whole rupees |
//! | Umbrella limit | max(IDV × 1.5, ₹10,00,000) |
//! | Combined single limit | min(umbrella × 0.8, ₹50,00,000) |
//! | Total insurance amount | IDV + combined single limit |

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::{max, min, round_to_rupee};

/// Multipliers, floors and caps for the coverage terms.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageRules {
    pub umbrella_multiplier: Decimal,
    pub umbrella_floor: Decimal,
    pub csl_factor: Decimal,
    pub csl_cap: Decimal,
}

impl Default for CoverageRules {
    fn default() -> Self {
        Self {
            umbrella_multiplier: Decimal::new(15, 1),
            umbrella_floor: Decimal::from(1_000_000),
            csl_factor: Decimal::new(8, 1),
            csl_cap: Decimal::from(5_000_000),
        }
    }
}

/// Coverage figures sent with the application, all in whole rupees.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoverageTerms {
    pub policy_annual_premium: Decimal,
    pub umbrella_limit: Decimal,
    pub policy_csl: Decimal,
    pub total_insurance_amount: Decimal,
}

impl CoverageRules {
    /// Derives the coverage terms. Intermediate values stay unrounded; each
    /// term is rounded to whole rupees on its own.
    ///
    /// Returns `None` when a term does not fit in a `Decimal`.
    pub fn terms(
        &self,
        idv: Decimal,
        total_premium: Decimal,
    ) -> Option<CoverageTerms> {
        let umbrella = max(idv.checked_mul(self.umbrella_multiplier)?, self.umbrella_floor);
        let csl = min(umbrella.checked_mul(self.csl_factor)?, self.csl_cap);

        Some(CoverageTerms {
            policy_annual_premium: round_to_rupee(total_premium),
            umbrella_limit: round_to_rupee(umbrella),
            policy_csl: round_to_rupee(csl),
            total_insurance_amount: round_to_rupee(idv.checked_add(csl)?),
        })
    }
}
