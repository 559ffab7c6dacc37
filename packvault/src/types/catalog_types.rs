//! Catalog reference types.
//!
//! Card templates are immutable reference data produced by catalog import.
//! The engine only ever reads them; nothing in this crate mutates a template
//! after creation.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Rarity classification for card templates and pack slots.
///
/// The declared order here is load-bearing for nothing; weighted slot tables
/// declare their own label order explicitly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    DoubleRare,
    UltraRare,
    IllustrationRare,
    SpecialIllustrationRare,
    MegaHyperRare,
    Energy,
}

impl Rarity {
    /// Stable string form used for persistence and wire payloads.
    pub fn as_str(&self) -> &'static str {
        match self {
            Rarity::Common => "common",
            Rarity::Uncommon => "uncommon",
            Rarity::Rare => "rare",
            Rarity::DoubleRare => "double_rare",
            Rarity::UltraRare => "ultra_rare",
            Rarity::IllustrationRare => "illustration_rare",
            Rarity::SpecialIllustrationRare => "special_illustration_rare",
            Rarity::MegaHyperRare => "mega_hyper_rare",
            Rarity::Energy => "energy",
        }
    }

    /// Parse the stable string form back into a rarity.
    pub fn parse(s: &str) -> Option<Rarity> {
        match s {
            "common" => Some(Rarity::Common),
            "uncommon" => Some(Rarity::Uncommon),
            "rare" => Some(Rarity::Rare),
            "double_rare" => Some(Rarity::DoubleRare),
            "ultra_rare" => Some(Rarity::UltraRare),
            "illustration_rare" => Some(Rarity::IllustrationRare),
            "special_illustration_rare" => Some(Rarity::SpecialIllustrationRare),
            "mega_hyper_rare" => Some(Rarity::MegaHyperRare),
            "energy" => Some(Rarity::Energy),
            _ => None,
        }
    }
}

impl fmt::Display for Rarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A card template from the catalog.
///
/// One template backs any number of physical inventory units. Templates are
/// created by catalog import and never mutated by the engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardTemplate {
    /// Numeric catalog identifier, unique across the catalog.
    pub template_id: u64,

    /// Display name of the card.
    pub name: String,

    /// Rarity label of the card.
    pub rarity: Rarity,

    /// Optional variant or finish (reverse holo, cosmos foil, ...).
    pub variant: Option<String>,

    /// Set the card belongs to.
    pub set_code: String,

    /// Whether this template fills the energy slot rather than a rarity slot.
    pub is_energy: bool,
}
