//! Weighted rarity sampling over fixed slot layouts.
//!
//! A pack type's layout is a versioned constant, not a database row. Each
//! slot resolves to exactly one rarity label by consuming exactly one draw
//! from the deterministic stream, in slot order — fixed slots consume and
//! discard their draw so the stream position stays identical across
//! implementations regardless of slot kind.
//!
//! Weighted slots resolve first-match-wins over cumulative ranges in the
//! declared table order (never sorted by weight). If floating drift leaves a
//! draw beyond the last cumulative boundary the last declared label wins;
//! that path is logged rather than treated as a silent default because it
//! indicates a misconfigured weight table.

use tracing::warn;

use crate::core::entropy::PackRng;
use crate::types::catalog_types::Rarity;

/// Tolerance for a weight table's probability sum.
pub const WEIGHT_SUM_TOLERANCE: f64 = 1e-6;

/// One position in a pack layout.
#[derive(Debug, Clone, Copy)]
pub enum SlotKind {
    /// Always resolves to the given label.
    Fixed(Rarity),
    /// Resolves over the given weight table, in declared order.
    Weighted(&'static [(Rarity, f64)]),
}

/// Versioned, ordered slot layout for one pack type.
#[derive(Debug, Clone, Copy)]
pub struct SlotLayout {
    /// Pack type identifier callers select by.
    pub pack_type: &'static str,
    /// Ordered slots; output order matches this declaration order.
    pub slots: &'static [SlotKind],
}

/// Flex slot distribution.
pub const FLEX_WEIGHTS: &[(Rarity, f64)] = &[
    (Rarity::Rare, 0.25),
    (Rarity::Uncommon, 0.35),
    (Rarity::Common, 0.40),
];

/// Reverse slot distribution.
pub const REVERSE_WEIGHTS: &[(Rarity, f64)] = &[
    (Rarity::MegaHyperRare, 0.0004),
    (Rarity::SpecialIllustrationRare, 0.0099),
    (Rarity::IllustrationRare, 0.1089),
    (Rarity::UltraRare, 0.035),
    (Rarity::DoubleRare, 0.08),
    (Rarity::Rare, 0.15),
    (Rarity::Uncommon, 0.28),
    (Rarity::Common, 0.3358),
];

/// Rare-or-better slot distribution.
pub const RARE_OR_BETTER_WEIGHTS: &[(Rarity, f64)] = &[
    (Rarity::MegaHyperRare, 0.000758),
    (Rarity::SpecialIllustrationRare, 0.008333),
    (Rarity::IllustrationRare, 0.090909),
    (Rarity::UltraRare, 0.071429),
    (Rarity::DoubleRare, 0.166667),
    (Rarity::Rare, 0.661905),
];

/// The standard 11-slot booster layout, version 1.
///
/// Output order is significant and matches this declaration:
/// `[Common x4, Uncommon x3, Flex, Reverse, RareOrBetter, Energy]`.
pub const BOOSTER_V1: SlotLayout = SlotLayout {
    pack_type: "booster-v1",
    slots: &[
        SlotKind::Fixed(Rarity::Common),
        SlotKind::Fixed(Rarity::Common),
        SlotKind::Fixed(Rarity::Common),
        SlotKind::Fixed(Rarity::Common),
        SlotKind::Fixed(Rarity::Uncommon),
        SlotKind::Fixed(Rarity::Uncommon),
        SlotKind::Fixed(Rarity::Uncommon),
        SlotKind::Weighted(FLEX_WEIGHTS),
        SlotKind::Weighted(REVERSE_WEIGHTS),
        SlotKind::Weighted(RARE_OR_BETTER_WEIGHTS),
        SlotKind::Fixed(Rarity::Energy),
    ],
};

/// Slot index of the rare-or-better slot in [`BOOSTER_V1`].
pub const RARE_OR_BETTER_SLOT: usize = 9;

impl SlotLayout {
    /// Look up the layout registered for a pack type identifier.
    pub fn for_pack_type(pack_type: &str) -> Option<&'static SlotLayout> {
        match pack_type {
            "booster-v1" => Some(&BOOSTER_V1),
            _ => None,
        }
    }

    /// Number of slots in this layout.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the layout has no slots.
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

/// Resolve one slot's rarity from a unit-interval roll.
///
/// Fixed slots ignore the roll; the caller must still have consumed one draw
/// for it to keep the stream position uniform across slot kinds.
pub fn resolve_slot(slot: &SlotKind, roll: f64) -> Rarity {
    match slot {
        SlotKind::Fixed(rarity) => *rarity,
        SlotKind::Weighted(table) => weighted_pick(table, roll),
    }
}

/// First-match-wins cumulative pick over a declared weight table.
fn weighted_pick(table: &[(Rarity, f64)], roll: f64) -> Rarity {
    let mut cumulative = 0.0;
    for (rarity, weight) in table {
        cumulative += weight;
        if roll < cumulative {
            return *rarity;
        }
    }
    // Floating drift pushed the roll past the final boundary. The last
    // declared label wins, but a table that sums below 1.0 reaches here for
    // honest rolls too, so surface it.
    let (last, _) = table[table.len() - 1];
    warn!(
        roll,
        cumulative,
        fallback = %last,
        "weighted draw fell past the final cumulative boundary; check weight table"
    );
    last
}

/// Sample the full ordered rarity lineup for a layout, one draw per slot.
pub fn sample_rarities(rng: &mut PackRng, layout: &SlotLayout) -> Vec<Rarity> {
    layout
        .slots
        .iter()
        .map(|slot| {
            let roll = rng.next_f64();
            resolve_slot(slot, roll)
        })
        .collect()
}

/// Sum a weight table's declared probabilities.
pub fn table_sum(table: &[(Rarity, f64)]) -> f64 {
    table.iter().map(|(_, w)| w).sum()
}
