//! Premium calculations for motor policy applications.
//!
//! The quote is a fixed formula over the customization group: a base rate on
//! the insured declared value, reduced by the no-claim bonus, plus add-on
//! surcharges and GST. Coverage terms are derived from the same inputs.

pub mod common;
pub mod coverage;
pub mod premium;

pub use coverage::{CoverageRules, CoverageTerms};
pub use premium::{
    MemoizedPremium, PremiumCalculator, PremiumError, PremiumInput, PremiumQuote, PremiumRates,
};
