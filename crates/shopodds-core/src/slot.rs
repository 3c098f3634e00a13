//! Per-slot appearance probability of the target.
//!
//! A slot first rolls a tier from the level's rate table; if it lands on the
//! target's tier, the copy shown is drawn uniformly from what is left of that
//! tier. Slots are treated as independent within one refresh.

use crate::model::rarity::{Level, Tier};
use crate::model::rates::LevelRateTable;

/// Rate lookup bound to one level and tier.
#[derive(Debug, Clone, Copy)]
pub struct SlotModel<'a> {
    rates: &'a LevelRateTable,
    level: Level,
    tier: Tier,
}

impl<'a> SlotModel<'a> {
    pub fn new(rates: &'a LevelRateTable, level: Level, tier: Tier) -> Self {
        Self { rates, level, tier }
    }

    /// Probability that a slot resolves to the target's tier.
    pub fn tier_rate(&self) -> f64 {
        self.rates.rate(self.level, self.tier)
    }

    /// Probability that one slot shows the target.
    pub fn hit_probability(&self, unit_remaining: u32, tier_remaining: u64) -> f64 {
        let rate = self.tier_rate();
        if rate <= 0.0 {
            return 0.0;
        }
        (rate * within_tier_probability(unit_remaining, tier_remaining)).clamp(0.0, 1.0)
    }
}

/// Share of the remaining tier copies that belong to the target.
pub fn within_tier_probability(unit_remaining: u32, tier_remaining: u64) -> f64 {
    if unit_remaining == 0 || tier_remaining == 0 {
        return 0.0;
    }
    (f64::from(unit_remaining) / tier_remaining as f64).min(1.0)
}

/// `rate[level][tier] * unit_remaining / tier_remaining`, or zero when any
/// factor is empty.
pub fn slot_hit_probability(
    rates: &LevelRateTable,
    level: Level,
    tier: Tier,
    unit_remaining: u32,
    tier_remaining: u64,
) -> f64 {
    SlotModel::new(rates, level, tier).hit_probability(unit_remaining, tier_remaining)
}
