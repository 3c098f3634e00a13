//! Forward dynamic program over the copies of the target still in the pool.
//!
//! The state is `u`, the target copies left from the player's point of view.
//! Each copy the player buys is also removed from the tier-wide pool, so the
//! rest of the tier is assumed to be bought at the same pace as the target.

use serde::{Deserialize, Serialize};
use tracing::{Level as TraceLevel, event};

use crate::model::distribution::Distribution;
use crate::model::rarity::{Level, Tier};
use crate::model::rates::LevelRateTable;
use crate::pool::PoolSnapshot;
use crate::refresh::refresh_pmf;
use crate::slot::SlotModel;

/// Starting point of a roll sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulationParams {
    pub level: Level,
    pub tier: Tier,
    pub unit_remaining: u32,
    pub tier_remaining: u64,
    pub rolls: u32,
}

impl SimulationParams {
    pub const fn from_snapshot(level: Level, tier: Tier, snapshot: PoolSnapshot, rolls: u32) -> Self {
        Self {
            level,
            tier,
            unit_remaining: snapshot.unit_remaining,
            tier_remaining: snapshot.tier_remaining,
            rolls,
        }
    }

    /// Tier copies left once `bought` target copies have been taken.
    pub(crate) fn tier_remaining_after(&self, bought: u32) -> u64 {
        self.tier_remaining.saturating_sub(u64::from(bought))
    }
}

/// Distribution of target copies bought after `params.rolls` refreshes,
/// indexed `0..=unit_remaining`.
pub fn simulate_bought(rates: &LevelRateTable, params: &SimulationParams) -> Distribution {
    let mut state = initial_state(params);
    let model = SlotModel::new(rates, params.level, params.tier);
    for roll in 0..params.rolls {
        state = step(&model, params, &state);
        trace_step(params, roll + 1, &state);
    }
    bought_from_state(params, state)
}

/// `P(bought >= 1)` after each refresh, one entry per roll.
pub fn simulate_trajectory(rates: &LevelRateTable, params: &SimulationParams) -> Vec<f64> {
    let start = params.unit_remaining as usize;
    let mut state = initial_state(params);
    let model = SlotModel::new(rates, params.level, params.tier);
    let mut trajectory = Vec::with_capacity(params.rolls as usize);
    for _ in 0..params.rolls {
        state = step(&model, params, &state);
        let untouched = state[start];
        trajectory.push((1.0 - untouched).clamp(0.0, 1.0));
    }
    trajectory
}

fn initial_state(params: &SimulationParams) -> Vec<f64> {
    let start = params.unit_remaining as usize;
    let mut state = vec![0.0; start + 1];
    state[start] = 1.0;
    state
}

fn step(model: &SlotModel<'_>, params: &SimulationParams, state: &[f64]) -> Vec<f64> {
    let mut next = vec![0.0; state.len()];
    let rate = model.tier_rate();

    for (u, &mass) in state.iter().enumerate() {
        if mass == 0.0 {
            continue;
        }
        let bought = params.unit_remaining - u as u32;
        let tier_left = params.tier_remaining_after(bought);
        if u == 0 || tier_left == 0 || rate <= 0.0 {
            next[u] += mass;
            continue;
        }

        let p_slot = model.hit_probability(u as u32, tier_left);
        let pmf = refresh_pmf(u as u32, tier_left, p_slot);
        for (k, p) in pmf.iter() {
            next[u - k] += mass * p;
        }
    }

    next
}

fn bought_from_state(params: &SimulationParams, state: Vec<f64>) -> Distribution {
    let start = params.unit_remaining as usize;
    let bought: Vec<f64> = (0..=start).map(|b| state[start - b]).collect();
    Distribution::from_weights(bought)
}

fn trace_step(params: &SimulationParams, roll: u32, state: &[f64]) {
    if !tracing::enabled!(TraceLevel::TRACE) {
        return;
    }
    let start = params.unit_remaining as usize;
    event!(
        target: "shopodds_core::simulate",
        TraceLevel::TRACE,
        roll,
        rolls = params.rolls,
        p_untouched = state[start],
        p_sold_out = state[0],
    );
}
