//! One-call evaluation: request record in, report record out.

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{Level as TraceLevel, event};

use crate::catalog::GameData;
use crate::model::consumption::ConsumptionState;
use crate::model::distribution::Distribution;
use crate::model::rarity::{Level, RarityClass, Tier};
use crate::model::rates::LevelRateTable;
use crate::pool::{PoolSnapshot, snapshot};
use crate::query::{instantaneous_estimate, query};
use crate::simulate::{SimulationParams, simulate_bought};
use crate::slot::SlotModel;

const DEFAULT_DESIRED_COUNT: u32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OddsRequest {
    pub level: Level,
    pub rarity: RarityClass,
    pub target_consumed: i64,
    /// Tier-wide consumption; `None` assumes only the target was contested.
    #[serde(default)]
    pub tier_consumed_total: Option<i64>,
    #[serde(default)]
    pub exclude_target_from_tier: bool,
    pub rolls: u32,
    #[serde(default = "default_desired_count")]
    pub desired_count: u32,
}

impl OddsRequest {
    pub const fn new(level: Level, rarity: RarityClass, target_consumed: i64, rolls: u32) -> Self {
        Self {
            level,
            rarity,
            target_consumed,
            tier_consumed_total: None,
            exclude_target_from_tier: false,
            rolls,
            desired_count: DEFAULT_DESIRED_COUNT,
        }
    }

    pub fn with_tier_consumed(mut self, total: i64, exclude_target: bool) -> Self {
        self.tier_consumed_total = Some(total);
        self.exclude_target_from_tier = exclude_target;
        self
    }

    pub fn with_desired_count(mut self, desired_count: u32) -> Self {
        self.desired_count = desired_count;
        self
    }

    pub fn consumption(&self) -> ConsumptionState {
        match self.tier_consumed_total {
            Some(total) => ConsumptionState::with_tier_total(
                self.target_consumed,
                total,
                self.exclude_target_from_tier,
            ),
            None => ConsumptionState::target_only(self.target_consumed),
        }
    }
}

fn default_desired_count() -> u32 {
    DEFAULT_DESIRED_COUNT
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OddsReport {
    pub unit_remaining: u32,
    pub tier_remaining: u64,
    /// Chance that one slot shows the target.
    pub p_slot_hit: f64,
    /// Depletion-free chance of seeing the target in one shop.
    pub p_shop_hit: f64,
    /// Depletion-free chance of seeing it at least once across all rolls.
    pub p_rolls_hit: f64,
    pub desired_count: u32,
    pub p_at_least_k: f64,
    pub p_exactly_k: f64,
    pub expected_copies: f64,
    /// Copies bought over the roll sequence, with depletion.
    pub distribution: Distribution,
}

impl OddsReport {
    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            unit_remaining: self.unit_remaining,
            tier_remaining: self.tier_remaining,
        }
    }
}

/// Runs the whole pipeline for one request against `rates`.
pub fn evaluate(rates: &LevelRateTable, request: &OddsRequest) -> OddsReport {
    let rarity = &request.rarity;
    let pool = snapshot(rarity, &request.consumption());
    let model = SlotModel::new(rates, request.level, rarity.tier);
    let p_slot_hit = model.hit_probability(pool.unit_remaining, pool.tier_remaining);
    let estimate = instantaneous_estimate(
        model.tier_rate(),
        pool.unit_remaining,
        pool.tier_remaining,
        request.rolls,
    );

    let params = SimulationParams::from_snapshot(request.level, rarity.tier, pool, request.rolls);
    let distribution = simulate_bought(rates, &params);
    let answer = query(&distribution, request.desired_count as usize);

    if tracing::enabled!(TraceLevel::DEBUG) {
        event!(
            target: "shopodds_core::engine",
            TraceLevel::DEBUG,
            level = request.level,
            tier = rarity.tier,
            unit_remaining = pool.unit_remaining,
            tier_remaining = pool.tier_remaining,
            p_slot_hit,
            rolls = request.rolls,
            desired = request.desired_count,
            p_at_least = answer.at_least_k,
        );
    }

    OddsReport {
        unit_remaining: pool.unit_remaining,
        tier_remaining: pool.tier_remaining,
        p_slot_hit,
        p_shop_hit: estimate.per_shop,
        p_rolls_hit: estimate.across_rolls,
        desired_count: request.desired_count,
        p_at_least_k: answer.at_least_k,
        p_exactly_k: answer.exactly_k,
        expected_copies: distribution.mean(),
        distribution,
    }
}

/// A target named by item rather than by tier layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemQuery<'a> {
    pub item: &'a str,
    pub level: Level,
    pub target_consumed: i64,
    pub tier_consumed_total: Option<i64>,
    pub exclude_target_from_tier: bool,
    pub rolls: u32,
    pub desired_count: u32,
}

impl<'a> ItemQuery<'a> {
    pub const fn new(item: &'a str, level: Level, target_consumed: i64, rolls: u32) -> Self {
        Self {
            item,
            level,
            target_consumed,
            tier_consumed_total: None,
            exclude_target_from_tier: false,
            rolls,
            desired_count: DEFAULT_DESIRED_COUNT,
        }
    }
}

/// Evaluates requests against a fixed set of game data.
#[derive(Debug, Clone, Default)]
pub struct ShopOddsEngine {
    data: GameData,
}

impl ShopOddsEngine {
    pub fn new(data: GameData) -> Self {
        Self { data }
    }

    pub fn builtin() -> Self {
        Self::new(GameData::builtin())
    }

    pub fn data(&self) -> &GameData {
        &self.data
    }

    pub fn rates(&self) -> &LevelRateTable {
        &self.data.level_rates
    }

    pub fn evaluate(&self, request: &OddsRequest) -> OddsReport {
        evaluate(&self.data.level_rates, request)
    }

    /// Pool layout of a named item, with the tier's item count from the roster.
    pub fn rarity_of(&self, item: &str) -> Result<RarityClass, OddsError> {
        let info = self
            .data
            .find_item(item)
            .ok_or_else(|| OddsError::UnknownItem(item.trim().to_string()))?;
        self.rarity_for_tier(info.tier, None)
    }

    pub fn rarity_for_tier(
        &self,
        tier: Tier,
        item_count: Option<u32>,
    ) -> Result<RarityClass, OddsError> {
        self.data
            .rarity(tier, item_count)
            .ok_or(OddsError::UnknownTier(tier))
    }

    pub fn evaluate_item(&self, item_query: &ItemQuery<'_>) -> Result<OddsReport, OddsError> {
        let rarity = self.rarity_of(item_query.item)?;
        let mut request = OddsRequest::new(
            item_query.level,
            rarity,
            item_query.target_consumed,
            item_query.rolls,
        )
        .with_desired_count(item_query.desired_count);
        if let Some(total) = item_query.tier_consumed_total {
            request = request.with_tier_consumed(total, item_query.exclude_target_from_tier);
        }
        Ok(self.evaluate(&request))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OddsError {
    #[error("item not recognized: {0}")]
    UnknownItem(String),
    #[error("tier {0} has no pool size configured")]
    UnknownTier(Tier),
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario_one() -> OddsRequest {
        OddsRequest::new(7, RarityClass::new(3, 18, 13), 6, 10)
    }

    #[test]
    fn scenario_one_reports_pool_and_probabilities() {
        let engine = ShopOddsEngine::builtin();
        let report = engine.evaluate(&scenario_one());

        assert_eq!(report.unit_remaining, 12);
        assert_eq!(report.tier_remaining, 228);
        assert!((report.p_slot_hit - 0.4 * 12.0 / 228.0).abs() < 1e-12);
        assert!(report.p_at_least_k > 0.0 && report.p_at_least_k < 1.0);
        assert!(report.p_at_least_k < report.p_rolls_hit);
        assert!(report.distribution.is_normalized());
        assert!(report.expected_copies > 0.0);
    }

    #[test]
    fn tier_consumption_lowers_the_tier_pool() {
        let engine = ShopOddsEngine::builtin();
        let base = engine.evaluate(&scenario_one());
        let contested = engine.evaluate(&scenario_one().with_tier_consumed(40, false));
        assert_eq!(contested.tier_remaining, 194);
        // Fewer competing copies makes the target easier to find.
        assert!(contested.p_at_least_k > base.p_at_least_k);
    }

    #[test]
    fn fully_contested_target_is_never_found() {
        let engine = ShopOddsEngine::builtin();
        let request = OddsRequest::new(8, RarityClass::new(4, 12, 13), 12, 40).with_desired_count(2);
        let report = engine.evaluate(&request);
        assert_eq!(report.unit_remaining, 0);
        assert_eq!(report.p_at_least_k, 0.0);
        assert_eq!(report.p_exactly_k, 0.0);
        assert_eq!(report.distribution.exactly(0), 1.0);
        assert_eq!(report.p_shop_hit, 0.0);
    }

    #[test]
    fn zero_rolls_returns_nothing_bought() {
        let engine = ShopOddsEngine::builtin();
        let report = engine.evaluate(&OddsRequest::new(7, RarityClass::new(3, 18, 13), 2, 0));
        assert_eq!(report.distribution.exactly(0), 1.0);
        assert_eq!(report.p_at_least_k, 0.0);
        assert_eq!(report.p_rolls_hit, 0.0);
    }

    #[test]
    fn desired_zero_is_certain() {
        let engine = ShopOddsEngine::builtin();
        let report = engine.evaluate(&scenario_one().with_desired_count(0));
        assert!((report.p_at_least_k - 1.0).abs() < 1e-9);
    }

    #[test]
    fn named_items_resolve_through_the_roster() {
        let engine = ShopOddsEngine::builtin();
        let by_name = engine
            .evaluate_item(&ItemQuery::new("ahri", 7, 6, 10))
            .expect("Ahri is tier 3");
        let by_layout = engine.evaluate(&scenario_one());
        assert_eq!(by_name, by_layout);
    }

    #[test]
    fn unknown_items_are_reported() {
        let engine = ShopOddsEngine::builtin();
        let err = engine
            .evaluate_item(&ItemQuery::new(" Teemo ", 7, 0, 10))
            .expect_err("not in the roster");
        assert_eq!(err, OddsError::UnknownItem("Teemo".to_string()));
        assert_eq!(err.to_string(), "item not recognized: Teemo");
    }

    #[test]
    fn unknown_tiers_are_reported() {
        let engine = ShopOddsEngine::builtin();
        assert_eq!(
            engine.rarity_for_tier(9, Some(4)),
            Err(OddsError::UnknownTier(9))
        );
    }

    #[test]
    fn request_defaults_apply_when_deserializing() {
        let json = r#"{
            "level": 7,
            "rarity": { "tier": 3, "copies_per_item": 18, "item_count": 13 },
            "target_consumed": 6,
            "rolls": 10
        }"#;
        let request: OddsRequest = serde_json::from_str(json).expect("request parses");
        assert_eq!(request, scenario_one());
    }
}
