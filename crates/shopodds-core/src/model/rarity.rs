use core::fmt;

use serde::{Deserialize, Serialize};

/// Rarity tier identifier (1 = most common).
pub type Tier = u8;

/// Player level used to index the rarity appearance table.
pub type Level = u8;

/// Pool layout of one rarity tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RarityClass {
    pub tier: Tier,
    /// Copies of each distinct item of this tier in the shared pool.
    pub copies_per_item: u32,
    /// Distinct items sharing this tier.
    pub item_count: u32,
}

impl RarityClass {
    pub const fn new(tier: Tier, copies_per_item: u32, item_count: u32) -> Self {
        Self {
            tier,
            copies_per_item,
            item_count,
        }
    }

    /// Total copies of the whole tier before anything is taken out.
    pub const fn pool_size(&self) -> u64 {
        self.copies_per_item as u64 * self.item_count as u64
    }
}

impl fmt::Display for RarityClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "tier {} ({} items x {} copies)",
            self.tier, self.item_count, self.copies_per_item
        )
    }
}
