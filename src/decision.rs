//! Discount Decisions
//!
//! The outcome of one evaluation, shaped for the host runtime: either no
//! discounts at all, or a single percentage discount over a set of variant
//! targets. Serialized field names follow the host's wire contract.

use rust_decimal::Decimal;
use serde::Serialize;

use crate::cart::CartLine;

/// How the host combines the discounts produced by one evaluation.
///
/// Only one discount is ever produced per evaluation, but the host contract
/// requires a strategy in the empty and non-empty cases alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStrategy {
    /// Apply only the first discount whose conditions are met.
    First,

    /// Apply the discount with the greatest value.
    Maximum,

    /// Apply every discount whose conditions are met.
    All,
}

/// The decision returned to the host for one cart evaluation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Decision {
    /// Strategy the host applies over `discounts`.
    pub discount_application_strategy: ApplicationStrategy,

    /// Zero or one discount records.
    pub discounts: Vec<Discount>,
}

impl Decision {
    /// The empty decision: no discounts, apply-all strategy.
    #[must_use]
    pub fn none() -> Self {
        Self {
            discount_application_strategy: ApplicationStrategy::All,
            discounts: Vec::new(),
        }
    }

    /// Whether this decision carries no discount.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.discounts.is_empty()
    }
}

/// A single percentage discount over a set of targets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discount {
    /// Shopper-facing description of the offer.
    pub message: String,

    /// The lines the discount applies to.
    pub targets: Vec<Target>,

    /// The discount value.
    pub value: DiscountValue,
}

/// One discount target.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Target {
    /// The targeted product variant.
    pub product_variant: VariantTarget,
}

/// A product variant targeted with its line quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VariantTarget {
    /// Variant identifier, as supplied on the cart line.
    pub id: String,

    /// Quantity the discount covers.
    pub quantity: i64,
}

/// Value carried by a discount record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiscountValue {
    /// Percentage-off value.
    pub percentage: Percentage,
}

/// A percentage rendered for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Percentage {
    /// The percentage with exactly one fractional digit, e.g. `"7.0"`.
    pub value: String,
}

/// Build a percentage-off decision covering the given target lines.
#[must_use]
pub fn percentage_off(percentage: Decimal, lines: &[&CartLine]) -> Decision {
    let targets = lines
        .iter()
        .map(|line| Target {
            product_variant: VariantTarget {
                id: line.merchandise.id.clone(),
                quantity: line.quantity,
            },
        })
        .collect();

    Decision {
        discount_application_strategy: ApplicationStrategy::All,
        discounts: vec![Discount {
            message: format!("Get {}% off your order!", shopper_display(percentage)),
            targets,
            value: DiscountValue {
                percentage: Percentage {
                    value: host_value(percentage),
                },
            },
        }],
    }
}

/// Render the percentage without trailing zeros for the shopper message.
fn shopper_display(percentage: Decimal) -> String {
    percentage.normalize().to_string()
}

/// Render the percentage with exactly one fractional digit for the host.
fn host_value(percentage: Decimal) -> String {
    let mut value = percentage.round_dp(1);
    value.rescale(1);

    value.to_string()
}
