//! Rounding helpers shared by the premium and coverage calculations.

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds to two decimal places (paise), half away from zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use insure_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(496.804)), dec!(496.80));
/// assert_eq!(round_half_up(dec!(496.805)), dec!(496.81));
/// ```
pub fn round_half_up(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds to whole rupees, half away from zero.
///
/// ```
/// use rust_decimal_macros::dec;
/// use insure_core::calculations::common::round_to_rupee;
///
/// assert_eq!(round_to_rupee(dec!(3256.80)), dec!(3257));
/// assert_eq!(round_to_rupee(dec!(3256.50)), dec!(3257));
/// assert_eq!(round_to_rupee(dec!(3256.49)), dec!(3256));
/// ```
pub fn round_to_rupee(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
}

/// Returns the larger of two values.
pub fn max(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a > b { a } else { b }
}

/// Returns the smaller of two values.
pub fn min(
    a: Decimal,
    b: Decimal,
) -> Decimal {
    if a < b { a } else { b }
}
