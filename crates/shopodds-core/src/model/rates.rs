use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rarity::{Level, Tier};

/// Maximum drift allowed when checking that a level's rates sum to one.
pub const RATE_SUM_TOLERANCE: f64 = 1e-6;

type Rows = BTreeMap<Level, BTreeMap<Tier, f64>>;

/// Level -> tier -> probability that a shop slot rolls that tier.
///
/// Immutable once built; every present level sums to one. Tiers that are not
/// unlocked yet may be omitted or listed with a zero rate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Rows", into = "Rows")]
pub struct LevelRateTable {
    rows: Rows,
}

impl LevelRateTable {
    pub fn new(rows: Rows) -> Result<Self, RateTableError> {
        if rows.is_empty() {
            return Err(RateTableError::Empty);
        }

        for (&level, row) in &rows {
            for (&tier, &rate) in row {
                if !rate.is_finite() || !(0.0..=1.0).contains(&rate) {
                    return Err(RateTableError::InvalidRate { level, tier, rate });
                }
            }
            let sum: f64 = row.values().sum();
            if (sum - 1.0).abs() > RATE_SUM_TOLERANCE {
                return Err(RateTableError::RowSum { level, sum });
            }
        }

        Ok(Self { rows })
    }

    /// Wraps rows that are known to satisfy the table invariants.
    pub(crate) fn from_trusted_rows(rows: Rows) -> Self {
        Self { rows }
    }

    /// Appearance rate of `tier` at `level`; zero when either is absent.
    pub fn rate(&self, level: Level, tier: Tier) -> f64 {
        self.rows
            .get(&level)
            .and_then(|row| row.get(&tier))
            .copied()
            .unwrap_or(0.0)
    }

    pub fn row(&self, level: Level) -> Option<&BTreeMap<Tier, f64>> {
        self.rows.get(&level)
    }

    pub fn contains_level(&self, level: Level) -> bool {
        self.rows.contains_key(&level)
    }

    pub fn levels(&self) -> impl Iterator<Item = Level> + '_ {
        self.rows.keys().copied()
    }
}

impl TryFrom<Rows> for LevelRateTable {
    type Error = RateTableError;

    fn try_from(rows: Rows) -> Result<Self, Self::Error> {
        Self::new(rows)
    }
}

impl From<LevelRateTable> for Rows {
    fn from(table: LevelRateTable) -> Self {
        table.rows
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum RateTableError {
    #[error("rate table has no levels")]
    Empty,
    #[error("level {level}: tier {tier} rate {rate} is outside [0, 1]")]
    InvalidRate { level: Level, tier: Tier, rate: f64 },
    #[error("level {level}: rates sum to {sum}, expected 1")]
    RowSum { level: Level, sum: f64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(pairs: &[(Tier, f64)]) -> BTreeMap<Tier, f64> {
        pairs.iter().copied().collect()
    }

    #[test]
    fn accepts_rows_summing_to_one() {
        let mut rows = BTreeMap::new();
        rows.insert(4, row(&[(1, 0.55), (2, 0.3), (3, 0.15), (4, 0.0)]));
        rows.insert(7, row(&[(1, 0.19), (2, 0.3), (3, 0.4), (4, 0.1), (5, 0.01)]));
        let table = LevelRateTable::new(rows).expect("valid table");

        assert_eq!(table.rate(7, 3), 0.4);
        assert_eq!(table.rate(4, 4), 0.0);
        assert_eq!(table.rate(4, 5), 0.0);
        assert_eq!(table.rate(11, 1), 0.0);
        assert_eq!(table.levels().collect::<Vec<_>>(), vec![4, 7]);
    }

    #[test]
    fn rejects_rows_that_do_not_sum_to_one() {
        let mut rows = BTreeMap::new();
        rows.insert(5, row(&[(1, 0.5), (2, 0.3)]));
        let err = LevelRateTable::new(rows).expect_err("sum is 0.8");
        assert!(matches!(err, RateTableError::RowSum { level: 5, .. }));
    }

    #[test]
    fn rejects_negative_rates() {
        let mut rows = BTreeMap::new();
        rows.insert(3, row(&[(1, 1.2), (2, -0.2)]));
        let err = LevelRateTable::new(rows).expect_err("negative rate");
        assert!(matches!(err, RateTableError::InvalidRate { level: 3, .. }));
    }

    #[test]
    fn rejects_empty_table() {
        assert_eq!(
            LevelRateTable::new(BTreeMap::new()),
            Err(RateTableError::Empty)
        );
    }
}
