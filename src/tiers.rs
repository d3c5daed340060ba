//! Discount Tiers
//!
//! Two threshold ladders drive the calculator: the percent schedule mapping
//! qualifying spend to a discount percentage, and the gift schedule mapping
//! spend to the free-gift tier keys a cart has unlocked.

use rust_decimal::Decimal;
use serde::Deserialize;
use smallvec::SmallVec;

/// Reserved metafield tags marking free-gift variants.
pub const GIFT_TIER_KEYS: [&str; 5] = ["tier1", "tier2", "tier3", "tier4", "tier5"];

/// Whether a metafield tag is one of the reserved free-gift tier keys.
#[must_use]
pub fn is_gift_key(tag: &str) -> bool {
    GIFT_TIER_KEYS.contains(&tag)
}

/// One percent schedule entry: spend `threshold` or more for `percentage` off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PercentTier {
    threshold: Decimal,
    percentage: Decimal,
}

impl PercentTier {
    /// Create a tier from its minimum qualifying amount and percentage.
    #[must_use]
    pub fn new(threshold: Decimal, percentage: Decimal) -> Self {
        Self {
            threshold,
            percentage,
        }
    }

    /// Minimum qualifying amount for this tier.
    #[must_use]
    pub fn threshold(&self) -> Decimal {
        self.threshold
    }

    /// Discount percentage granted by this tier.
    #[must_use]
    pub fn percentage(&self) -> Decimal {
        self.percentage
    }
}

/// Ordered percentage table; the highest threshold met wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PercentSchedule {
    tiers: Vec<PercentTier>,
}

impl PercentSchedule {
    /// Create a schedule. Entries are kept highest threshold first
    /// regardless of the order supplied.
    #[must_use]
    pub fn new(mut tiers: Vec<PercentTier>) -> Self {
        tiers.sort_by(|a, b| b.threshold.cmp(&a.threshold));

        Self { tiers }
    }

    /// The highest percentage whose threshold `amount` meets, if any.
    ///
    /// Exactly one tier (or none) applies; thresholds are not cumulative.
    #[must_use]
    pub fn percentage_for(&self, amount: Decimal) -> Option<Decimal> {
        self.tiers
            .iter()
            .find(|tier| amount >= tier.threshold)
            .map(PercentTier::percentage)
    }
}

impl Default for PercentSchedule {
    /// The stock ladder: 3% at 250, 5% at 500, 7% at 1000.
    fn default() -> Self {
        Self::new(vec![
            PercentTier::new(Decimal::from(250), Decimal::from(3)),
            PercentTier::new(Decimal::from(500), Decimal::from(5)),
            PercentTier::new(Decimal::from(1000), Decimal::from(7)),
        ])
    }
}

/// One gift schedule entry: spending `minimum` unlocks the gift tagged `key`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GiftTier {
    minimum: Decimal,
    key: &'static str,
}

impl GiftTier {
    /// Minimum original cart total unlocking this gift.
    #[must_use]
    pub fn minimum(&self) -> Decimal {
        self.minimum
    }

    /// The metafield tag marking this tier's gift lines.
    #[must_use]
    pub fn key(&self) -> &'static str {
        self.key
    }
}

/// The free-gift ladder, ordered lowest minimum first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GiftSchedule {
    tiers: SmallVec<[GiftTier; 5]>,
}

impl GiftSchedule {
    /// Tiers unlocked by `total`, lowest minimum first.
    pub fn qualifying(&self, total: Decimal) -> impl Iterator<Item = &GiftTier> {
        self.tiers.iter().filter(move |tier| total >= tier.minimum)
    }
}

impl Default for GiftSchedule {
    /// The stock ladder: tier1 at 0, tier2 at 250, tier3 at 750,
    /// tier4 at 2500, tier5 at 4000.
    fn default() -> Self {
        let minimums = [0, 250, 750, 2500, 4000];

        Self {
            tiers: minimums
                .into_iter()
                .zip(GIFT_TIER_KEYS)
                .map(|(minimum, key)| GiftTier {
                    minimum: Decimal::from(minimum),
                    key,
                })
                .collect(),
        }
    }
}
