//! Premium quote for a motor policy.
//!
//! # Formula
//!
//! | Line | Description |
//! |------|-------------|
//! | 1 | Basic premium: IDV × base rate × (1 − NCB) |
//! | 2 | Add-on premium: Σ line 1 × add-on rate |
//! | 3 | Subtotal: line 1 + line 2 |
//! | 4 | Tax: line 3 × GST rate |
//! | 5 | Total: line 1 + line 2 + line 4 |
//!
//! Lines 1, 2 and 4 are rounded to paise before they are summed, so the total
//! is always exactly the sum of the displayed components.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use insure_core::calculations::{PremiumCalculator, PremiumInput};
//! use insure_core::{AddOn, NoClaimBonus};
//!
//! let calculator = PremiumCalculator::standard();
//! let input = PremiumInput::new(dec!(100000), NoClaimBonus::Twenty, [AddOn::ZeroDepreciation]);
//!
//! let quote = calculator.calculate(&input).unwrap();
//!
//! assert_eq!(quote.basic_premium, dec!(2400.00));
//! assert_eq!(quote.addon_premium, dec!(360.00));
//! assert_eq!(quote.tax, dec!(496.80));
//! assert_eq!(quote.total, dec!(3256.80));
//! assert_eq!(quote.total_rupees(), dec!(3257));
//! ```

use std::collections::BTreeSet;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

use crate::calculations::common::{round_half_up, round_to_rupee};
use crate::calculations::coverage::{CoverageRules, CoverageTerms};
use crate::models::{AddOn, NoClaimBonus, PolicyCustomization};

/// Errors that can occur while pricing a policy.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PremiumError {
    /// A configured rate is outside `0..=1`.
    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    /// The insured declared value is negative.
    #[error("insured declared value cannot be negative, got {0}")]
    NegativeIdv(Decimal),

    /// An intermediate amount does not fit in a `Decimal`.
    #[error("{0} is out of range; the insured declared value is too large")]
    Overflow(&'static str),
}

/// Rate table for the premium formula.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumRates {
    /// Share of the IDV charged as basic premium.
    pub base_rate: Decimal,
    /// GST applied to basic plus add-on premium.
    pub tax_rate: Decimal,
    pub zero_depreciation: Decimal,
    pub engine_protection: Decimal,
    pub roadside_assistance: Decimal,
    pub consumables_cover: Decimal,
    pub personal_accident_cover: Decimal,
}

impl Default for PremiumRates {
    fn default() -> Self {
        Self {
            base_rate: Decimal::new(3, 2),
            tax_rate: Decimal::new(18, 2),
            zero_depreciation: Decimal::new(15, 2),
            engine_protection: Decimal::new(10, 2),
            roadside_assistance: Decimal::new(5, 2),
            consumables_cover: Decimal::new(8, 2),
            personal_accident_cover: Decimal::new(12, 2),
        }
    }
}

impl PremiumRates {
    /// Surcharge rate for `addon`, as a share of the basic premium.
    pub fn addon_rate(
        &self,
        addon: AddOn,
    ) -> Decimal {
        match addon {
            AddOn::ZeroDepreciation => self.zero_depreciation,
            AddOn::EngineProtection => self.engine_protection,
            AddOn::RoadsideAssistance => self.roadside_assistance,
            AddOn::ConsumablesCover => self.consumables_cover,
            AddOn::PersonalAccidentCover => self.personal_accident_cover,
        }
    }

    /// Checks that every rate is within `0..=1`.
    pub fn validate(&self) -> Result<(), PremiumError> {
        let rates = [
            ("base rate", self.base_rate),
            ("tax rate", self.tax_rate),
            ("zero depreciation rate", self.zero_depreciation),
            ("engine protection rate", self.engine_protection),
            ("roadside assistance rate", self.roadside_assistance),
            ("consumables cover rate", self.consumables_cover),
            ("personal accident cover rate", self.personal_accident_cover),
        ];

        for (name, value) in rates {
            if value < Decimal::ZERO || value > Decimal::ONE {
                return Err(PremiumError::InvalidRate { name, value });
            }
        }
        Ok(())
    }
}

/// The inputs a quote depends on. Add-ons are a set, so selection order and
/// duplicates do not change the price.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PremiumInput {
    pub idv: Decimal,
    pub ncb: NoClaimBonus,
    pub addons: BTreeSet<AddOn>,
}

impl PremiumInput {
    pub fn new(
        idv: Decimal,
        ncb: NoClaimBonus,
        addons: impl IntoIterator<Item = AddOn>,
    ) -> Self {
        Self {
            idv,
            ncb,
            addons: addons.into_iter().collect(),
        }
    }

    /// Builds the input from the customization group. A blank IDV prices as
    /// zero and a blank NCB as no discount, matching an untouched form.
    pub fn from_policy(policy: &PolicyCustomization) -> Self {
        Self::new(
            policy.idv.unwrap_or(Decimal::ZERO),
            policy.ncb.unwrap_or(NoClaimBonus::Zero),
            policy.addons.iter().copied(),
        )
    }
}

/// Result of pricing a policy.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PremiumQuote {
    /// Basic premium after the no-claim bonus.
    pub basic_premium: Decimal,
    /// Sum of the add-on surcharges.
    pub addon_premium: Decimal,
    /// GST on basic plus add-on premium.
    pub tax: Decimal,
    /// `basic_premium + addon_premium + tax`.
    pub total: Decimal,
    pub coverage: CoverageTerms,
}

impl PremiumQuote {
    pub fn subtotal(&self) -> Decimal {
        self.basic_premium + self.addon_premium
    }

    /// Total premium in whole rupees, as shown to the applicant.
    pub fn total_rupees(&self) -> Decimal {
        round_to_rupee(self.total)
    }
}

/// Prices policies with a fixed rate table.
#[derive(Debug, Clone)]
pub struct PremiumCalculator {
    rates: PremiumRates,
    coverage: CoverageRules,
}

impl PremiumCalculator {
    /// Creates a calculator after validating `rates`.
    pub fn new(
        rates: PremiumRates,
        coverage: CoverageRules,
    ) -> Result<Self, PremiumError> {
        rates.validate()?;
        Ok(Self { rates, coverage })
    }

    /// Calculator with the published rate table.
    pub fn standard() -> Self {
        Self {
            rates: PremiumRates::default(),
            coverage: CoverageRules::default(),
        }
    }

    pub fn rates(&self) -> &PremiumRates {
        &self.rates
    }

    /// Calculates the quote for `input`.
    ///
    /// # Errors
    ///
    /// Returns [`PremiumError::NegativeIdv`] if the IDV is below zero and
    /// [`PremiumError::Overflow`] if the IDV is too large to price.
    pub fn calculate(
        &self,
        input: &PremiumInput,
    ) -> Result<PremiumQuote, PremiumError> {
        if input.idv < Decimal::ZERO {
            return Err(PremiumError::NegativeIdv(input.idv));
        }

        let basic_exact = self.basic_premium(input.idv, input.ncb)?;
        let addon_exact = self.addon_premium(basic_exact, &input.addons)?;

        let basic_premium = round_half_up(basic_exact);
        let addon_premium = round_half_up(addon_exact);
        let subtotal = basic_premium
            .checked_add(addon_premium)
            .ok_or(PremiumError::Overflow("subtotal"))?;
        let tax = self.tax(subtotal)?;
        let total = subtotal
            .checked_add(tax)
            .ok_or(PremiumError::Overflow("total premium"))?;

        let coverage = self
            .coverage
            .terms(input.idv, total)
            .ok_or(PremiumError::Overflow("coverage"))?;

        trace!(idv = %input.idv, ncb = input.ncb.percent(), %total, "premium calculated");

        Ok(PremiumQuote {
            basic_premium,
            addon_premium,
            tax,
            total,
            coverage,
        })
    }

    /// Basic premium before rounding.
    fn basic_premium(
        &self,
        idv: Decimal,
        ncb: NoClaimBonus,
    ) -> Result<Decimal, PremiumError> {
        idv.checked_mul(self.rates.base_rate)
            .and_then(|v| v.checked_mul(Decimal::ONE - ncb.discount()))
            .ok_or(PremiumError::Overflow("basic premium"))
    }

    /// Add-on premium before rounding.
    fn addon_premium(
        &self,
        basic_premium: Decimal,
        addons: &BTreeSet<AddOn>,
    ) -> Result<Decimal, PremiumError> {
        addons
            .iter()
            .try_fold(Decimal::ZERO, |sum, addon| {
                basic_premium
                    .checked_mul(self.rates.addon_rate(*addon))
                    .and_then(|line| sum.checked_add(line))
            })
            .ok_or(PremiumError::Overflow("add-on premium"))
    }

    fn tax(
        &self,
        subtotal: Decimal,
    ) -> Result<Decimal, PremiumError> {
        subtotal
            .checked_mul(self.rates.tax_rate)
            .map(round_half_up)
            .ok_or(PremiumError::Overflow("tax"))
    }
}

impl Default for PremiumCalculator {
    fn default() -> Self {
        Self::standard()
    }
}

/// Remembers the last input and its quote so repeated renders with the same
/// inputs do not recompute.
#[derive(Debug, Clone, Default)]
pub struct MemoizedPremium {
    calculator: PremiumCalculator,
    last: Option<(PremiumInput, PremiumQuote)>,
    computations: usize,
}

impl MemoizedPremium {
    pub fn new(calculator: PremiumCalculator) -> Self {
        Self {
            calculator,
            last: None,
            computations: 0,
        }
    }

    pub fn quote(
        &mut self,
        input: &PremiumInput,
    ) -> Result<PremiumQuote, PremiumError> {
        if let Some((last_input, quote)) = &self.last {
            if last_input == input {
                return Ok(quote.clone());
            }
        }

        let quote = self.calculator.calculate(input)?;
        self.computations += 1;
        self.last = Some((input.clone(), quote.clone()));
        Ok(quote)
    }

    /// Number of times the underlying calculator actually ran.
    pub fn computations(&self) -> usize {
        self.computations
    }
}
