//! Parsing and display helpers for form values.

use rust_decimal::Decimal;
use thiserror::Error;

use crate::calculations::common::{round_half_up, round_to_rupee};

/// Error returned when a string cannot be parsed as a [`Decimal`].
#[derive(Debug, Error)]
#[error("invalid amount '{input}': {source}")]
pub struct ParseAmountError {
    input: String,
    #[source]
    source: rust_decimal::Error,
}

/// Trims whitespace and drops commas, so both `1,00,000` and `100,000` parse.
fn normalize_amount_input(s: &str) -> String {
    s.trim().trim_start_matches('₹').replace(',', "")
}

/// Parses an optional rupee amount. Blank input is `None`.
pub fn parse_optional_amount(s: &str) -> Result<Option<Decimal>, ParseAmountError> {
    let normalized = normalize_amount_input(s);
    if normalized.is_empty() {
        return Ok(None);
    }
    normalized.parse().map(Some).map_err(|e| {
        tracing::warn!(input = %s, "invalid amount: {}", e);
        ParseAmountError {
            input: s.to_string(),
            source: e,
        }
    })
}

/// Whole rupees with Indian digit grouping, e.g. `₹50,00,000`.
pub fn format_rupees(amount: Decimal) -> String {
    let rounded = round_to_rupee(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let digits = rounded.abs().trunc().to_string();
    format!("{sign}₹{}", group_indian(&digits))
}

/// Rupees and paise with Indian digit grouping, e.g. `₹2,400.00`.
pub fn format_amount(amount: Decimal) -> String {
    let rounded = round_half_up(amount);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() { "-" } else { "" };
    let abs = rounded.abs();
    let whole = abs.trunc();
    let paise = ((abs - whole) * Decimal::ONE_HUNDRED).trunc();
    format!(
        "{sign}₹{}.{:0>2}",
        group_indian(&whole.to_string()),
        paise.to_string()
    )
}

/// Formats an optional amount, using "—" when `None`.
pub fn opt_rupees_display(amount: Option<Decimal>) -> String {
    amount.map(format_rupees).unwrap_or_else(|| "—".to_string())
}

/// Groups the last three digits, then pairs: `1234567` → `12,34,567`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (mut head, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while head.len() > 2 {
        let (rest, pair) = head.split_at(head.len() - 2);
        groups.push(pair);
        head = rest;
    }
    groups.push(head);
    groups.reverse();
    format!("{},{tail}", groups.join(","))
}
