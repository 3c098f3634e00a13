//! Static game data: pool sizes per tier, the level rate table and the item
//! roster used to resolve a target by name.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::model::rarity::{RarityClass, Tier};
use crate::model::rates::LevelRateTable;

/// Upper bound on copies of one item; the simulator allocates one state per copy.
pub const MAX_COPIES_PER_ITEM: u32 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub name: String,
    pub tier: Tier,
}

impl ItemInfo {
    pub fn new(name: impl Into<String>, tier: Tier) -> Self {
        Self {
            name: name.into(),
            tier,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameData {
    pub copies_per_item: BTreeMap<Tier, u32>,
    pub level_rates: LevelRateTable,
    #[serde(default)]
    pub items: Vec<ItemInfo>,
}

impl GameData {
    /// Set 15 roster, pool sizes and shop odds.
    pub fn builtin() -> Self {
        let copies_per_item = BTreeMap::from([(1, 29), (2, 22), (3, 18), (4, 12), (5, 10)]);

        let level_rates = LevelRateTable::from_trusted_rows(
            BUILTIN_RATES
                .iter()
                .map(|(level, rates)| {
                    let row = rates
                        .iter()
                        .enumerate()
                        .map(|(idx, rate)| (idx as Tier + 1, *rate))
                        .collect();
                    (*level, row)
                })
                .collect(),
        );

        let items = BUILTIN_ROSTER
            .iter()
            .map(|(name, tier)| ItemInfo::new(*name, *tier))
            .collect();

        Self {
            copies_per_item,
            level_rates,
            items,
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for (&tier, &copies) in &self.copies_per_item {
            if copies == 0 {
                return Err(CatalogError::ZeroCopies { tier });
            }
            if copies > MAX_COPIES_PER_ITEM {
                return Err(CatalogError::TooManyCopies { tier, copies });
            }
        }

        let mut seen = HashSet::new();
        for item in &self.items {
            let key = normalize_name(&item.name);
            if key.is_empty() {
                return Err(CatalogError::EmptyName);
            }
            if !self.copies_per_item.contains_key(&item.tier) {
                return Err(CatalogError::MissingTier {
                    item: item.name.clone(),
                    tier: item.tier,
                });
            }
            if !seen.insert(key) {
                return Err(CatalogError::DuplicateItem(item.name.clone()));
            }
        }

        Ok(())
    }

    /// Finds an item ignoring case, spaces and punctuation ("kaisa" finds "Kai'Sa").
    pub fn find_item(&self, name: &str) -> Option<&ItemInfo> {
        let key = normalize_name(name);
        if key.is_empty() {
            return None;
        }
        self.items
            .iter()
            .find(|item| normalize_name(&item.name) == key)
    }

    pub fn items_in_tier(&self, tier: Tier) -> u32 {
        self.items.iter().filter(|item| item.tier == tier).count() as u32
    }

    /// Pool layout of `tier`; `item_count` overrides the roster count.
    pub fn rarity(&self, tier: Tier, item_count: Option<u32>) -> Option<RarityClass> {
        let copies = *self.copies_per_item.get(&tier)?;
        let count = item_count.unwrap_or_else(|| self.items_in_tier(tier));
        Some(RarityClass::new(tier, copies, count))
    }
}

impl Default for GameData {
    fn default() -> Self {
        Self::builtin()
    }
}

/// Lowercased alphanumerics only.
pub fn normalize_name(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    #[error("tier {tier} has zero copies per item")]
    ZeroCopies { tier: Tier },
    #[error("tier {tier} has {copies} copies per item, more than {max}", max = MAX_COPIES_PER_ITEM)]
    TooManyCopies { tier: Tier, copies: u32 },
    #[error("item '{item}' uses tier {tier}, which has no pool size")]
    MissingTier { item: String, tier: Tier },
    #[error("item '{0}' is listed more than once")]
    DuplicateItem(String),
    #[error("item name must not be empty")]
    EmptyName,
}

const BUILTIN_RATES: [(u8, [f64; 5]); 7] = [
    (4, [0.55, 0.30, 0.15, 0.00, 0.00]),
    (5, [0.45, 0.33, 0.20, 0.02, 0.00]),
    (6, [0.30, 0.40, 0.25, 0.05, 0.00]),
    (7, [0.19, 0.30, 0.40, 0.10, 0.01]),
    (8, [0.17, 0.24, 0.32, 0.24, 0.03]),
    (9, [0.15, 0.18, 0.25, 0.30, 0.12]),
    (10, [0.05, 0.10, 0.20, 0.40, 0.25]),
];

const BUILTIN_ROSTER: [(&str, Tier); 62] = [
    ("Aatrox", 1),
    ("Ezreal", 1),
    ("Garen", 1),
    ("Gnar", 1),
    ("Kalista", 1),
    ("Kayle", 1),
    ("Kennen", 1),
    ("Lucian", 1),
    ("Malphite", 1),
    ("Naafiri", 1),
    ("Rell", 1),
    ("Sivir", 1),
    ("Syndra", 1),
    ("Zac", 1),
    ("Dr. Mundo", 2),
    ("Gangplank", 2),
    ("Janna", 2),
    ("Jhin", 2),
    ("Kai'Sa", 2),
    ("Katarina", 2),
    ("Kobuko", 2),
    ("Lux", 2),
    ("Rakan", 2),
    ("Shen", 2),
    ("Vi", 2),
    ("Xayah", 2),
    ("Xin Zhao", 2),
    ("Ahri", 3),
    ("Caitlyn", 3),
    ("Darius", 3),
    ("Jayce", 3),
    ("Kog'Maw", 3),
    ("Malzahar", 3),
    ("Neeko", 3),
    ("Senna", 3),
    ("Swain", 3),
    ("Udyr", 3),
    ("Viego", 3),
    ("Yasuo", 3),
    ("Ziggs", 3),
    ("Akali", 4),
    ("Ashe", 4),
    ("Jarvan IV", 4),
    ("Jinx", 4),
    ("K'Sante", 4),
    ("Karma", 4),
    ("Leona", 4),
    ("Poppy", 4),
    ("Ryze", 4),
    ("Samira", 4),
    ("Sett", 4),
    ("Volibear", 4),
    ("Yuumi", 4),
    ("Braum", 5),
    ("Ekko", 5),
    ("Gwen", 5),
    ("Lee Sin", 5),
    ("Seraphine", 5),
    ("Twisted Fate", 5),
    ("Varus", 5),
    ("Yone", 5),
    ("Zyra", 5),
];
