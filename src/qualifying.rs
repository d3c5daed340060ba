//! Qualifying Totals
//!
//! The three interchangeable policies computing the amount a cart qualifies
//! with. All are pure functions of the snapshot; a cost string that fails to
//! parse disqualifies the cart instead of raising an error.

use std::fmt;

use rust_decimal::Decimal;
use rustc_hash::FxHashSet;
use serde::Deserialize;

use crate::{
    cart::{Cart, CartLine},
    tiers::GiftSchedule,
};

/// A policy computing the qualifying amount for a cart.
pub trait QualifyingTotal: fmt::Debug {
    /// Compute the qualifying amount.
    ///
    /// Returns `None` when a cost could not be parsed; the caller must treat
    /// the cart as not qualifying rather than comparing against thresholds.
    /// A returned amount is never negative.
    fn compute(&self, cart: &Cart) -> Option<Decimal>;

    /// The lines a discount applies to under this policy.
    fn targets<'a>(&self, cart: &'a Cart) -> Vec<&'a CartLine>;
}

/// Selects the qualifying-total policy for a deployment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TotalPolicy {
    /// The cart's total cost, verbatim.
    #[default]
    RawTotal,

    /// Sum of non-gift line costs only.
    ExcludeGiftsByTotal,

    /// Cart total minus one gift line per unlocked gift tier.
    ExcludeGiftsByTier,
}

impl TotalPolicy {
    /// Build the policy implementation this selector names.
    #[must_use]
    pub fn build(self) -> Box<dyn QualifyingTotal + Send + Sync> {
        match self {
            Self::RawTotal => Box::new(RawTotal),
            Self::ExcludeGiftsByTotal => Box::new(ExcludeGiftsByTotal),
            Self::ExcludeGiftsByTier => Box::new(ExcludeGiftsByTier::default()),
        }
    }
}

/// Qualify with the cart total exactly as the host reported it.
#[derive(Debug, Clone, Copy, Default)]
pub struct RawTotal;

impl QualifyingTotal for RawTotal {
    fn compute(&self, cart: &Cart) -> Option<Decimal> {
        cart.total().map(|total| total.max(Decimal::ZERO))
    }

    fn targets<'a>(&self, cart: &'a Cart) -> Vec<&'a CartLine> {
        cart.lines.iter().collect()
    }
}

/// Qualify with the cost of non-gift lines; gift lines never count towards
/// the threshold and never receive the discount.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcludeGiftsByTotal;

impl QualifyingTotal for ExcludeGiftsByTotal {
    fn compute(&self, cart: &Cart) -> Option<Decimal> {
        let total: Option<Decimal> = cart
            .lines
            .iter()
            .filter(|line| !line.is_gift())
            .map(CartLine::total)
            .sum();

        total.map(|amount| amount.max(Decimal::ZERO))
    }

    fn targets<'a>(&self, cart: &'a Cart) -> Vec<&'a CartLine> {
        cart.lines.iter().filter(|line| !line.is_gift()).collect()
    }
}

/// Qualify with the cart total minus the per-unit cost of one gift line per
/// unlocked gift tier.
///
/// The set of unlocked tiers is fixed from the original cart total before any
/// exclusion is applied; exclusions never change which tiers unlock.
#[derive(Debug, Default)]
pub struct ExcludeGiftsByTier {
    schedule: GiftSchedule,
}

impl ExcludeGiftsByTier {
    /// Use a specific gift schedule.
    #[must_use]
    pub fn new(schedule: GiftSchedule) -> Self {
        Self { schedule }
    }
}

impl QualifyingTotal for ExcludeGiftsByTier {
    fn compute(&self, cart: &Cart) -> Option<Decimal> {
        let total = cart.total()?;

        let mut qualifying = total;
        let mut excluded_ids = FxHashSet::default();
        let mut excluded_variants = FxHashSet::default();

        for tier in self.schedule.qualifying(total) {
            for line in &cart.lines {
                if excluded_ids.contains(line.id.as_str())
                    || excluded_variants.contains(line.merchandise.id.as_str())
                {
                    continue;
                }

                if line.metafield_value() != Some(tier.key()) {
                    continue;
                }

                // One exclusion per tier; a chosen line is spent both by
                // line id and by variant id.
                qualifying -= line.unit_cost()?;
                excluded_ids.insert(line.id.as_str());
                excluded_variants.insert(line.merchandise.id.as_str());
                break;
            }
        }

        Some(qualifying.max(Decimal::ZERO))
    }

    fn targets<'a>(&self, cart: &'a Cart) -> Vec<&'a CartLine> {
        cart.lines.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use crate::cart::{Cost, Merchandise, Metafield, MoneyV2, Product};

    use super::*;

    fn line(id: &str, variant: &str, quantity: i64, amount: &str, tag: Option<&str>) -> CartLine {
        CartLine {
            id: id.to_string(),
            quantity,
            cost: Cost {
                total_amount: MoneyV2 {
                    amount: amount.to_string(),
                },
            },
            merchandise: Merchandise {
                id: variant.to_string(),
                product: tag.map(|value| Product {
                    metafield: Some(Metafield {
                        value: value.to_string(),
                    }),
                }),
            },
        }
    }

    fn cart(total: &str, lines: Vec<CartLine>) -> Cart {
        Cart {
            cost: Cost {
                total_amount: MoneyV2 {
                    amount: total.to_string(),
                },
            },
            lines,
        }
    }

    #[test]
    fn raw_total_takes_the_cart_total_verbatim() {
        let cart = cart("600.00", vec![line("l1", "v1", 1, "600.00", None)]);

        assert_eq!(RawTotal.compute(&cart), Some(Decimal::from(600)));
    }

    #[test]
    fn raw_total_disqualifies_unparseable_totals() {
        let cart = cart("six hundred", vec![line("l1", "v1", 1, "600.00", None)]);

        assert_eq!(RawTotal.compute(&cart), None);
    }

    #[test]
    fn raw_total_targets_every_line() {
        let cart = cart(
            "600.00",
            vec![
                line("l1", "v1", 1, "400.00", None),
                line("l2", "v2", 1, "200.00", Some("tier2")),
            ],
        );

        assert_eq!(RawTotal.targets(&cart).len(), 2);
    }

    #[test]
    fn exclude_by_total_sums_only_non_gift_lines() {
        // Total 600 with a 200 gift line qualifies at 400, not 600.
        let cart = cart(
            "600.00",
            vec![
                line("l1", "v1", 1, "250.00", None),
                line("l2", "v2", 1, "200.00", Some("tier2")),
                line("l3", "v3", 1, "150.00", None),
            ],
        );

        assert_eq!(ExcludeGiftsByTotal.compute(&cart), Some(Decimal::from(400)));
    }

    #[test]
    fn exclude_by_total_counts_unreserved_tags_as_revenue() {
        let cart = cart(
            "300.00",
            vec![
                line("l1", "v1", 1, "200.00", Some("bundle")),
                line("l2", "v2", 1, "100.00", None),
            ],
        );

        assert_eq!(ExcludeGiftsByTotal.compute(&cart), Some(Decimal::from(300)));
    }

    #[test]
    fn exclude_by_total_disqualifies_on_unparseable_line_cost() {
        let cart = cart(
            "600.00",
            vec![
                line("l1", "v1", 1, "not-a-cost", None),
                line("l2", "v2", 1, "200.00", None),
            ],
        );

        assert_eq!(ExcludeGiftsByTotal.compute(&cart), None);
    }

    #[test]
    fn exclude_by_total_is_zero_for_an_all_gift_cart() {
        let cart = cart("250.00", vec![line("l1", "v1", 1, "250.00", Some("tier1"))]);

        assert_eq!(ExcludeGiftsByTotal.compute(&cart), Some(Decimal::ZERO));
    }

    #[test]
    fn exclude_by_total_targets_skip_gift_lines() {
        let cart = cart(
            "600.00",
            vec![
                line("l1", "v1", 1, "400.00", None),
                line("l2", "v2", 1, "200.00", Some("tier2")),
            ],
        );

        let targets = ExcludeGiftsByTotal.targets(&cart);

        assert_eq!(targets.len(), 1);
        assert!(targets.iter().all(|target| !target.is_gift()));
    }

    #[test]
    fn gift_tiers_subtract_one_line_per_unlocked_tier() {
        // 1300 unlocks tier1..tier3; only tier1 and tier2 gifts are present.
        let cart = cart(
            "1300.00",
            vec![
                line("l1", "v1", 1, "50.00", Some("tier1")),
                line("l2", "v2", 1, "100.00", Some("tier2")),
                line("l3", "v3", 1, "1150.00", None),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), Some(Decimal::from(1150)));
    }

    #[test]
    fn gift_tiers_fix_qualifying_set_before_excluding() {
        // 760 unlocks tier1..tier3. Excluding the tier1 gift drops the
        // running amount below tier3's minimum, but tier3 still excludes.
        let cart = cart(
            "760.00",
            vec![
                line("l1", "v1", 1, "300.00", Some("tier1")),
                line("l2", "v2", 1, "10.00", Some("tier2")),
                line("l3", "v3", 1, "50.00", Some("tier3")),
                line("l4", "v4", 1, "400.00", None),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), Some(Decimal::from(400)));
    }

    #[test]
    fn gift_tiers_exclude_at_most_one_line_per_key() {
        // Two tier1 gifts: only the first in line order is subtracted.
        let cart = cart(
            "300.00",
            vec![
                line("l1", "v1", 1, "30.00", Some("tier1")),
                line("l2", "v2", 1, "40.00", Some("tier1")),
                line("l3", "v3", 1, "20.00", Some("tier2")),
                line("l4", "v4", 1, "210.00", None),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), Some(Decimal::from(250)));
    }

    #[test]
    fn gift_tiers_never_reuse_an_excluded_variant() {
        // Both gift lines share a variant; tier2 finds nothing left to take.
        let cart = cart(
            "300.00",
            vec![
                line("l1", "v1", 1, "50.00", Some("tier1")),
                line("l2", "v1", 1, "70.00", Some("tier2")),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), Some(Decimal::from(250)));
    }

    #[test]
    fn gift_tiers_subtract_the_per_unit_cost() {
        // A two-unit gift line only loses one unit's worth.
        let cart = cart(
            "500.00",
            vec![
                line("l1", "v1", 2, "100.00", Some("tier1")),
                line("l2", "v2", 1, "400.00", None),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), Some(Decimal::from(450)));
    }

    #[test]
    fn gift_tiers_disqualify_on_unparseable_gift_cost() {
        let cart = cart(
            "500.00",
            vec![
                line("l1", "v1", 1, "broken", Some("tier1")),
                line("l2", "v2", 1, "400.00", None),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), None);
    }

    #[test]
    fn gift_tiers_clamp_the_amount_at_zero() {
        let cart = cart("100.00", vec![line("l1", "v1", 1, "500.00", Some("tier1"))]);

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.compute(&cart), Some(Decimal::ZERO));
    }

    #[test]
    fn gift_tiers_target_every_line_including_gifts() {
        let cart = cart(
            "1300.00",
            vec![
                line("l1", "v1", 1, "50.00", Some("tier1")),
                line("l2", "v2", 1, "1250.00", None),
            ],
        );

        let policy = ExcludeGiftsByTier::default();

        assert_eq!(policy.targets(&cart).len(), 2);
    }

    #[test]
    fn policy_selector_builds_each_implementation() {
        let cart = cart(
            "600.00",
            vec![
                line("l1", "v1", 1, "400.00", None),
                line("l2", "v2", 1, "200.00", Some("tier2")),
            ],
        );

        assert_eq!(
            TotalPolicy::RawTotal.build().compute(&cart),
            Some(Decimal::from(600))
        );
        assert_eq!(
            TotalPolicy::ExcludeGiftsByTotal.build().compute(&cart),
            Some(Decimal::from(400))
        );
        assert_eq!(
            TotalPolicy::ExcludeGiftsByTier.build().compute(&cart),
            Some(Decimal::from(400))
        );
    }
}
