//! Shop roll probability engine.
//!
//! Turns a rarity pool, the copies already taken out of it and a
//! level-dependent rarity table into the distribution of copies a player
//! picks up over a run of shop refreshes. Everything here is pure arithmetic:
//! no I/O, no shared state.

#![deny(warnings)]

pub mod catalog;
pub mod engine;
pub mod evidence;
pub mod format;
pub mod model;
pub mod montecarlo;
pub mod pool;
pub mod query;
pub mod refresh;
pub mod simulate;
pub mod slot;

pub use catalog::{CatalogError, GameData, ItemInfo};
pub use engine::{ItemQuery, OddsError, OddsReport, OddsRequest, ShopOddsEngine, evaluate};
pub use model::consumption::ConsumptionState;
pub use model::distribution::Distribution;
pub use model::rarity::{Level, RarityClass, Tier};
pub use model::rates::{LevelRateTable, RateTableError};

pub struct AppInfo;

impl AppInfo {
    pub const fn name() -> &'static str {
        "shopodds"
    }

    pub const fn version() -> &'static str {
        env!("CARGO_PKG_VERSION")
    }
}

#[cfg(test)]
mod tests {
    use super::AppInfo;

    #[test]
    fn exposes_static_metadata() {
        assert_eq!(AppInfo::name(), "shopodds");
        assert!(!AppInfo::version().is_empty());
    }
}
