//! Money
//!
//! Monetary amounts cross the host boundary as decimal strings. Parsing is
//! fail-soft: a string that is not a decimal yields `None`, and callers treat
//! the cart as not qualifying instead of raising an error.

use rust_decimal::Decimal;

/// Parse a decimal amount string received from the host.
#[must_use]
pub fn parse_amount(raw: &str) -> Option<Decimal> {
    raw.trim().parse().ok()
}
