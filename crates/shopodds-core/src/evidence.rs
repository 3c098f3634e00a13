//! Turns observed boards into contested-copy counts.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::catalog::{GameData, normalize_name};
use crate::engine::OddsError;
use crate::model::consumption::ConsumptionState;
use crate::model::rarity::Tier;

/// Copies merged into one unit of each star level.
const COPIES_PER_MERGE: u32 = 3;
const MAX_STAR: u8 = 3;

/// A unit seen on someone's board or bench.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObservedUnit {
    pub name: String,
    pub star: u8,
}

impl ObservedUnit {
    pub fn new(name: impl Into<String>, star: u8) -> Self {
        Self {
            name: name.into(),
            star,
        }
    }
}

/// Copies a unit of `star` level took out of the pool (1, 3 or 9).
pub fn copies_for_star(star: u8) -> u32 {
    let level = star.clamp(1, MAX_STAR);
    COPIES_PER_MERGE.pow(u32::from(level - 1))
}

/// Accumulates contested copies per item and per tier.
#[derive(Debug, Clone)]
pub struct ContestedTally<'a> {
    data: &'a GameData,
    by_item: HashMap<String, i64>,
    by_tier: BTreeMap<Tier, i64>,
    skipped: usize,
}

impl<'a> ContestedTally<'a> {
    pub fn new(data: &'a GameData) -> Self {
        Self {
            data,
            by_item: HashMap::new(),
            by_tier: BTreeMap::new(),
            skipped: 0,
        }
    }

    /// Records one unit. Units missing from the roster are skipped and
    /// `false` is returned.
    pub fn observe(&mut self, unit: &ObservedUnit) -> bool {
        let Some(info) = self.data.find_item(&unit.name) else {
            warn!(
                target: "shopodds_core::evidence",
                unit = %unit.name,
                star = unit.star,
                "skipping unit missing from the roster"
            );
            self.skipped += 1;
            return false;
        };

        let copies = i64::from(copies_for_star(unit.star));
        *self.by_item.entry(normalize_name(&info.name)).or_default() += copies;
        *self.by_tier.entry(info.tier).or_default() += copies;
        true
    }

    pub fn observe_all<'u>(&mut self, units: impl IntoIterator<Item = &'u ObservedUnit>) -> usize {
        units.into_iter().filter(|unit| self.observe(unit)).count()
    }

    pub fn target_consumed(&self, name: &str) -> i64 {
        self.by_item
            .get(&normalize_name(name))
            .copied()
            .unwrap_or(0)
    }

    pub fn tier_consumed(&self, tier: Tier) -> i64 {
        self.by_tier.get(&tier).copied().unwrap_or(0)
    }

    /// Units that could not be matched to the roster.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Consumption state for `target`; the tier total includes the target's
    /// own copies.
    pub fn consumption_for(&self, target: &str) -> Result<ConsumptionState, OddsError> {
        let info = self
            .data
            .find_item(target)
            .ok_or_else(|| OddsError::UnknownItem(target.trim().to_string()))?;
        Ok(ConsumptionState::with_tier_total(
            self.target_consumed(&info.name),
            self.tier_consumed(info.tier),
            false,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn star_levels_map_to_merged_copies() {
        assert_eq!(copies_for_star(1), 1);
        assert_eq!(copies_for_star(2), 3);
        assert_eq!(copies_for_star(3), 9);
        assert_eq!(copies_for_star(0), 1);
        assert_eq!(copies_for_star(7), 9);
    }

    #[test]
    fn tally_counts_items_and_tiers() {
        let data = GameData::builtin();
        let mut tally = ContestedTally::new(&data);
        let boards = [
            ObservedUnit::new("Ahri", 2),
            ObservedUnit::new("ahri", 1),
            ObservedUnit::new("Darius", 2),
            ObservedUnit::new("Jinx", 1),
            ObservedUnit::new("Teemo", 3),
        ];
        assert_eq!(tally.observe_all(&boards), 4);
        assert_eq!(tally.skipped(), 1);

        assert_eq!(tally.target_consumed("AHRI"), 4);
        assert_eq!(tally.tier_consumed(3), 7);
        assert_eq!(tally.tier_consumed(4), 1);
        assert_eq!(tally.tier_consumed(5), 0);

        let state = tally.consumption_for("Ahri").expect("known target");
        assert_eq!(state, ConsumptionState::with_tier_total(4, 7, false));
    }

    #[test]
    fn unknown_target_is_an_error() {
        let data = GameData::builtin();
        let tally = ContestedTally::new(&data);
        assert_eq!(
            tally.consumption_for("Teemo"),
            Err(OddsError::UnknownItem("Teemo".to_string()))
        );
    }
}
