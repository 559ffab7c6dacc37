//! Template resolution over a sampled rarity lineup.
//!
//! Resolution interleaves with sampling on the same draw stream: for each
//! slot, one rarity draw, then immediately one template draw. The template
//! draw is consumed even when the catalog has no eligible template, so the
//! stream position — and therefore the rarity sequence — never depends on
//! catalog contents.

use serde::{Deserialize, Serialize};

use crate::catalog::CatalogStore;
use crate::core::entropy::PackRng;
use crate::core::sampler::{self, SlotLayout};
use crate::types::catalog_types::{CardTemplate, Rarity};

/// One slot of a resolved lineup.
///
/// `template` is `None` when the catalog had nothing eligible for the slot's
/// rarity: previews surface the slot as unresolved, builds fail the whole
/// request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolvedSlot {
    /// Rarity the sampler drew for this slot.
    pub rarity: Rarity,
    /// Concrete template backing the slot, if the catalog had one.
    pub template: Option<CardTemplate>,
}

/// Resolve the full ordered lineup for a layout.
///
/// Consumes exactly two draws per slot in slot order: the rarity draw, then
/// the template draw.
pub fn resolve_lineup(
    rng: &mut PackRng,
    layout: &SlotLayout,
    catalog: &dyn CatalogStore,
) -> Vec<ResolvedSlot> {
    layout
        .slots
        .iter()
        .map(|slot| {
            let rarity_roll = rng.next_f64();
            let rarity = sampler::resolve_slot(slot, rarity_roll);

            let template_roll = rng.next_f64();
            let subset = catalog.templates_for_rarity(rarity);
            let template = if subset.is_empty() {
                None
            } else {
                let idx = (template_roll * subset.len() as f64) as usize;
                Some(subset[idx.min(subset.len() - 1)].clone())
            };

            ResolvedSlot { rarity, template }
        })
        .collect()
}
