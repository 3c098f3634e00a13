pub mod consumption;
pub mod distribution;
pub mod rarity;
pub mod rates;
