//! Remaining copies of the target and of its tier.

use serde::Serialize;

use crate::model::consumption::ConsumptionState;
use crate::model::rarity::RarityClass;

/// What is left in the shared pool at query time. Derived, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PoolSnapshot {
    pub unit_remaining: u32,
    pub tier_remaining: u64,
}

impl PoolSnapshot {
    /// Nothing of the target can show up from this pool.
    pub const fn is_exhausted(&self) -> bool {
        self.unit_remaining == 0 || self.tier_remaining == 0
    }
}

/// Clamps the consumption counts against the tier layout. Never fails.
pub fn snapshot(rarity: &RarityClass, consumption: &ConsumptionState) -> PoolSnapshot {
    let unit_remaining = u64::from(rarity.copies_per_item)
        .saturating_sub(consumption.clamped_target()) as u32;
    let tier_remaining = rarity
        .pool_size()
        .saturating_sub(consumption.effective_tier_consumed());

    PoolSnapshot {
        unit_remaining,
        tier_remaining,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn target_only_consumption() {
        let rarity = RarityClass::new(3, 18, 13);
        let snap = snapshot(&rarity, &ConsumptionState::target_only(6));
        assert_eq!(snap.unit_remaining, 12);
        assert_eq!(snap.tier_remaining, 228);
    }

    #[test]
    fn exclusion_flag_adds_target_back_to_tier_total() {
        let rarity = RarityClass::new(3, 18, 13);
        let inclusive = snapshot(&rarity, &ConsumptionState::with_tier_total(6, 30, false));
        let exclusive = snapshot(&rarity, &ConsumptionState::with_tier_total(6, 30, true));
        assert_eq!(inclusive.tier_remaining, 204);
        assert_eq!(exclusive.tier_remaining, 210);
        assert_eq!(inclusive.unit_remaining, exclusive.unit_remaining);
    }

    #[test]
    fn over_consumption_clamps_to_zero() {
        let rarity = RarityClass::new(5, 10, 8);
        let snap = snapshot(&rarity, &ConsumptionState::with_tier_total(25, 500, false));
        assert_eq!(snap.unit_remaining, 0);
        assert_eq!(snap.tier_remaining, 0);
        assert!(snap.is_exhausted());
    }

    #[test]
    fn negative_consumption_is_treated_as_none() {
        let rarity = RarityClass::new(1, 29, 14);
        let snap = snapshot(&rarity, &ConsumptionState::with_tier_total(-4, -40, true));
        assert_eq!(snap.unit_remaining, 29);
        assert_eq!(snap.tier_remaining, 406);
    }

    #[test]
    fn empty_tier_layout_is_exhausted() {
        let rarity = RarityClass::new(2, 0, 13);
        let snap = snapshot(&rarity, &ConsumptionState::default());
        assert!(snap.is_exhausted());
    }
}
