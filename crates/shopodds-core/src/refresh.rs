//! Distribution of copies obtained in one shop refresh.

use crate::model::distribution::Distribution;

/// Slots offered by a single shop refresh.
pub const SHOP_SLOTS: usize = 5;

/// Copies obtained in one refresh, supported on `0..=min(5, unit_remaining)`.
///
/// Slots are independent Bernoulli trials with success `p_slot`. Outcomes that
/// would take more copies than remain are dropped and the rest rescaled.
pub fn refresh_pmf(unit_remaining: u32, tier_remaining: u64, p_slot: f64) -> Distribution {
    refresh_pmf_with_slots(SHOP_SLOTS, unit_remaining, tier_remaining, p_slot)
}

pub fn refresh_pmf_with_slots(
    slots: usize,
    unit_remaining: u32,
    tier_remaining: u64,
    p_slot: f64,
) -> Distribution {
    if unit_remaining == 0 || tier_remaining == 0 || slots == 0 || !(p_slot > 0.0) {
        return Distribution::degenerate();
    }

    let p = p_slot.min(1.0);
    let q = 1.0 - p;
    let cap = slots.min(unit_remaining as usize);

    let mut weights = Vec::with_capacity(cap + 1);
    let mut ln_choose = 0.0f64;
    for k in 0..=cap {
        if k > 0 {
            // ln C(n, k) = ln C(n, k - 1) + ln(n - k + 1) - ln(k)
            ln_choose += ((slots - k + 1) as f64).ln() - (k as f64).ln();
        }
        let weight = ln_choose.exp() * p.powi(k as i32) * q.powi((slots - k) as i32);
        weights.push(weight);
    }

    let kept: f64 = weights.iter().sum();
    if kept <= 0.0 {
        // Every slot hits but fewer copies remain than slots: the refresh
        // takes whatever is left.
        return Distribution::point_mass(cap);
    }

    Distribution::from_weights(weights)
}
