//! Cart Snapshot
//!
//! Read-only view of the cart supplied by the host runtime for one
//! evaluation. Types mirror the host's wire contract and deserialize
//! directly from its JSON; the calculator never mutates them.

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::{money, tiers};

/// The cart presented for discount evaluation.
#[derive(Debug, Clone, Deserialize)]
pub struct Cart {
    /// Aggregate cost of the cart.
    pub cost: Cost,

    /// Line items in presentation order.
    #[serde(default)]
    pub lines: Vec<CartLine>,
}

impl Cart {
    /// The cart total as a decimal, if the host sent a parseable amount.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        money::parse_amount(&self.cost.total_amount.amount)
    }
}

/// A cost envelope holding a total amount.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cost {
    /// The total monetary amount.
    pub total_amount: MoneyV2,
}

/// A monetary value as the host transmits it: a decimal string.
#[derive(Debug, Clone, Deserialize)]
pub struct MoneyV2 {
    /// Decimal amount, e.g. `"250.00"`.
    pub amount: String,
}

/// One entry in the cart.
#[derive(Debug, Clone, Deserialize)]
pub struct CartLine {
    /// Host identifier for this line.
    pub id: String,

    /// Number of units on the line.
    pub quantity: i64,

    /// Cost of the whole line.
    pub cost: Cost,

    /// The purchasable variant this line references.
    pub merchandise: Merchandise,
}

impl CartLine {
    /// The line total as a decimal, if parseable.
    #[must_use]
    pub fn total(&self) -> Option<Decimal> {
        money::parse_amount(&self.cost.total_amount.amount)
    }

    /// Cost of a single unit on this line (line total divided by quantity).
    ///
    /// `None` when the line total is unparseable or the quantity is zero.
    #[must_use]
    pub fn unit_cost(&self) -> Option<Decimal> {
        self.total()?.checked_div(Decimal::from(self.quantity))
    }

    /// The product metafield tag, when present.
    #[must_use]
    pub fn metafield_value(&self) -> Option<&str> {
        self.merchandise
            .product
            .as_ref()?
            .metafield
            .as_ref()
            .map(|metafield| metafield.value.as_str())
    }

    /// Whether this line is tagged as a free gift.
    #[must_use]
    pub fn is_gift(&self) -> bool {
        self.metafield_value().is_some_and(tiers::is_gift_key)
    }
}

/// Variant reference carried by a cart line.
#[derive(Debug, Clone, Deserialize)]
pub struct Merchandise {
    /// Variant identifier.
    pub id: String,

    /// Product metadata, when the host resolves it.
    pub product: Option<Product>,
}

/// Product metadata attached to a variant.
#[derive(Debug, Clone, Deserialize)]
pub struct Product {
    /// The free-gift marker metafield, when configured.
    pub metafield: Option<Metafield>,
}

/// A single metafield value.
#[derive(Debug, Clone, Deserialize)]
pub struct Metafield {
    /// Raw string value of the metafield.
    pub value: String,
}
