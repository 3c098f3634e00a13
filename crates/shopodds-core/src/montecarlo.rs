//! Sampled reference for the roll simulator.
//!
//! Plays the same closed-pool model one refresh at a time with explicit
//! random draws. A refresh that would take more copies than remain is
//! redrawn, which matches the rescaling done by the exact simulator.

use rand::Rng;

use crate::model::distribution::Distribution;
use crate::model::rates::LevelRateTable;
use crate::refresh::SHOP_SLOTS;
use crate::simulate::SimulationParams;
use crate::slot::SlotModel;

/// Redraws allowed before a refresh is resolved as taking everything left.
const MAX_REDRAWS: usize = 1_000;

/// Histogram of copies bought over `trials` sampled roll sequences.
pub fn sample_bought_distribution<R: Rng + ?Sized>(
    rates: &LevelRateTable,
    params: &SimulationParams,
    trials: usize,
    rng: &mut R,
) -> Distribution {
    if trials == 0 {
        return Distribution::degenerate();
    }

    let model = SlotModel::new(rates, params.level, params.tier);
    let start = params.unit_remaining;
    let mut counts = vec![0.0f64; start as usize + 1];

    for _ in 0..trials {
        let mut unit = start;
        for _ in 0..params.rolls {
            let tier_left = params.tier_remaining_after(start - unit);
            if unit == 0 || tier_left == 0 {
                break;
            }
            let p_slot = model.hit_probability(unit, tier_left);
            if p_slot <= 0.0 {
                break;
            }
            unit -= sample_refresh(p_slot, unit, rng);
        }
        counts[(start - unit) as usize] += 1.0;
    }

    Distribution::from_weights(counts)
}

fn sample_refresh<R: Rng + ?Sized>(p_slot: f64, unit: u32, rng: &mut R) -> u32 {
    let cap = unit.min(SHOP_SLOTS as u32);
    for _ in 0..MAX_REDRAWS {
        let hits = (0..SHOP_SLOTS).filter(|_| rng.gen_bool(p_slot)).count() as u32;
        if hits <= unit {
            return hits;
        }
    }
    cap
}
