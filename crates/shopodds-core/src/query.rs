//! Scalar answers read off a distribution, plus the closed-form estimate that
//! ignores depletion.

use serde::Serialize;

use crate::model::distribution::Distribution;
use crate::refresh::SHOP_SLOTS;
use crate::slot::within_tier_probability;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct QueryResult {
    pub exactly_k: f64,
    pub at_least_k: f64,
}

pub fn query(distribution: &Distribution, k: usize) -> QueryResult {
    QueryResult {
        exactly_k: distribution.exactly(k),
        at_least_k: distribution.at_least(k),
    }
}

/// Depletion-free estimate: every refresh sees the same pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct InstantEstimate {
    /// Chance of seeing the target at least once in a single shop.
    pub per_shop: f64,
    /// Chance of seeing it at least once across all rolls.
    pub across_rolls: f64,
}

/// `1 - (1 - u/t)^(5 * rate)` per shop, chained over `rolls` independent shops.
pub fn instantaneous_estimate(
    tier_rate: f64,
    unit_remaining: u32,
    tier_remaining: u64,
    rolls: u32,
) -> InstantEstimate {
    let per_shop = per_shop_hit(tier_rate, unit_remaining, tier_remaining);
    InstantEstimate {
        per_shop,
        across_rolls: rolls_hit(per_shop, rolls),
    }
}

pub fn per_shop_hit(tier_rate: f64, unit_remaining: u32, tier_remaining: u64) -> f64 {
    if tier_rate <= 0.0 {
        return 0.0;
    }
    let share = within_tier_probability(unit_remaining, tier_remaining);
    if share <= 0.0 {
        return 0.0;
    }
    let expected_tier_slots = SHOP_SLOTS as f64 * tier_rate;
    (1.0 - (1.0 - share).powf(expected_tier_slots)).clamp(0.0, 1.0)
}

pub fn rolls_hit(per_shop: f64, rolls: u32) -> f64 {
    if per_shop <= 0.0 || rolls == 0 {
        return 0.0;
    }
    (1.0 - (1.0 - per_shop.min(1.0)).powf(f64::from(rolls))).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_reads_exact_and_tail_mass() {
        let dist = Distribution::from_weights(vec![0.5, 0.3, 0.2]);
        let result = query(&dist, 1);
        assert!((result.exactly_k - 0.3).abs() < 1e-12);
        assert!((result.at_least_k - 0.5).abs() < 1e-12);

        let past = query(&dist, 7);
        assert_eq!(past.exactly_k, 0.0);
        assert_eq!(past.at_least_k, 0.0);
    }

    #[test]
    fn estimate_follows_the_closed_form() {
        let estimate = instantaneous_estimate(0.4, 12, 228, 10);
        let share: f64 = 12.0 / 228.0;
        let per_shop = 1.0 - (1.0 - share).powf(2.0);
        assert!((estimate.per_shop - per_shop).abs() < 1e-12);
        let across = 1.0 - (1.0 - per_shop).powi(10);
        assert!((estimate.across_rolls - across).abs() < 1e-12);
    }

    #[test]
    fn estimate_is_zero_for_degenerate_inputs() {
        assert_eq!(instantaneous_estimate(0.0, 12, 228, 10).across_rolls, 0.0);
        assert_eq!(instantaneous_estimate(0.4, 0, 228, 10).per_shop, 0.0);
        assert_eq!(instantaneous_estimate(0.4, 12, 0, 10).per_shop, 0.0);
        let no_rolls = instantaneous_estimate(0.4, 12, 228, 0);
        assert!(no_rolls.per_shop > 0.0);
        assert_eq!(no_rolls.across_rolls, 0.0);
    }
}
