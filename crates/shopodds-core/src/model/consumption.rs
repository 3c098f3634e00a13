use serde::{Deserialize, Serialize};

/// Copies already taken out of the shared pool before the simulated rolls.
///
/// Counts are signed because they usually come from manual entry or screen
/// recognition and can be inconsistent; the pool calculator clamps them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConsumptionState {
    /// Copies of the target item held by anyone.
    pub target_consumed: i64,
    /// Copies of the whole tier held by anyone.
    pub tier_consumed_total: i64,
    /// When set, `tier_consumed_total` is read as already counting the
    /// target's copies and those are subtracted once more.
    #[serde(default)]
    pub exclude_target_from_tier: bool,
}

impl ConsumptionState {
    /// Only the target has been contested; the rest of the tier is untouched.
    pub const fn target_only(target_consumed: i64) -> Self {
        Self {
            target_consumed,
            tier_consumed_total: target_consumed,
            exclude_target_from_tier: false,
        }
    }

    pub const fn with_tier_total(
        target_consumed: i64,
        tier_consumed_total: i64,
        exclude_target_from_tier: bool,
    ) -> Self {
        Self {
            target_consumed,
            tier_consumed_total,
            exclude_target_from_tier,
        }
    }

    pub(crate) fn clamped_target(&self) -> u64 {
        self.target_consumed.max(0) as u64
    }

    /// Tier-wide consumption after applying the exclusion flag, never negative.
    pub(crate) fn effective_tier_consumed(&self) -> u64 {
        let total = self.tier_consumed_total.max(0) as u64;
        if self.exclude_target_from_tier {
            total.saturating_sub(self.clamped_target())
        } else {
            total
        }
    }
}

#[cfg(test)]
mod tests {
    use super::ConsumptionState;

    #[test]
    fn target_only_mirrors_target_into_tier_total() {
        let state = ConsumptionState::target_only(6);
        assert_eq!(state.tier_consumed_total, 6);
        assert!(!state.exclude_target_from_tier);
        assert_eq!(state.effective_tier_consumed(), 6);
    }

    #[test]
    fn exclusion_subtracts_target_and_never_goes_negative() {
        let state = ConsumptionState::with_tier_total(6, 20, true);
        assert_eq!(state.effective_tier_consumed(), 14);

        let inconsistent = ConsumptionState::with_tier_total(9, 4, true);
        assert_eq!(inconsistent.effective_tier_consumed(), 0);
    }

    #[test]
    fn negative_counts_clamp_to_zero() {
        let state = ConsumptionState::with_tier_total(-3, -10, false);
        assert_eq!(state.clamped_target(), 0);
        assert_eq!(state.effective_tier_consumed(), 0);
    }
}
