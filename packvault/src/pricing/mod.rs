//! Rarity price lookup for settlement terms.
//!
//! The table is supplied by the pricing pipeline and consumed read-only when
//! a session's economic terms are computed for the settlement handoff. The
//! engine never adjusts prices.

use std::collections::HashMap;

use crate::types::catalog_types::Rarity;

/// Read-only price-per-rarity lookup, in smallest currency units.
#[derive(Debug, Clone)]
pub struct PriceTable {
    prices: HashMap<Rarity, u64>,
}

impl PriceTable {
    /// Build a table from explicit entries.
    pub fn new(entries: impl IntoIterator<Item = (Rarity, u64)>) -> Self {
        Self {
            prices: entries.into_iter().collect(),
        }
    }

    /// Price for one rarity. Unpriced rarities settle at zero.
    pub fn price_for(&self, rarity: Rarity) -> u64 {
        self.prices.get(&rarity).copied().unwrap_or(0)
    }

    /// Per-slot price vector for a rarity lineup, in slot order.
    pub fn price_vector(&self, rarities: &[Rarity]) -> Vec<u64> {
        rarities.iter().map(|r| self.price_for(*r)).collect()
    }

    /// Total price of a rarity lineup.
    pub fn total(&self, rarities: &[Rarity]) -> u64 {
        rarities.iter().map(|r| self.price_for(*r)).sum()
    }
}

impl Default for PriceTable {
    /// The standard table in smallest currency units.
    fn default() -> Self {
        Self::new([
            (Rarity::Common, 1_000_000),
            (Rarity::Uncommon, 2_000_000),
            (Rarity::Rare, 3_000_000),
            (Rarity::DoubleRare, 6_000_000),
            (Rarity::UltraRare, 10_000_000),
            (Rarity::IllustrationRare, 15_000_000),
            (Rarity::SpecialIllustrationRare, 30_000_000),
            (Rarity::MegaHyperRare, 50_000_000),
            (Rarity::Energy, 1_000_000),
        ])
    }
}
