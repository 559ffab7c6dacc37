//! Shared fixtures for the integration suites.
#![allow(dead_code)]

use std::sync::Arc;

use packvault::{
    CardTemplate, CatalogStore, EngineConfig, InventoryStore, InventoryUnit, MemoryCatalog,
    MemoryInventoryStore, MemorySessionStore, PackEngine, Rarity, SessionStore,
};

pub const SECRET: &str = "dev-server-seed";
pub const PACK_TYPE: &str = "booster-v1";

pub const ALL_RARITIES: [Rarity; 8] = [
    Rarity::Common,
    Rarity::Uncommon,
    Rarity::Rare,
    Rarity::DoubleRare,
    Rarity::UltraRare,
    Rarity::IllustrationRare,
    Rarity::SpecialIllustrationRare,
    Rarity::MegaHyperRare,
];

pub struct Fixture {
    pub engine: Arc<PackEngine>,
    pub catalog: Arc<MemoryCatalog>,
    pub inventory: Arc<MemoryInventoryStore>,
    pub sessions: Arc<MemorySessionStore>,
}

pub fn template(id: u64, rarity: Rarity, is_energy: bool) -> CardTemplate {
    CardTemplate {
        template_id: id,
        name: format!("card-{id}"),
        rarity,
        variant: None,
        set_code: "base".to_string(),
        is_energy,
    }
}

/// Catalog with `per_rarity` templates for every rarity plus two energy
/// templates. Template ids are assigned deterministically from 1.
pub fn full_catalog(per_rarity: u64) -> Vec<CardTemplate> {
    let mut templates = Vec::new();
    let mut id = 1;
    for rarity in ALL_RARITIES {
        for _ in 0..per_rarity {
            templates.push(template(id, rarity, false));
            id += 1;
        }
    }
    for _ in 0..2 {
        templates.push(template(id, Rarity::Common, true));
        id += 1;
    }
    templates
}

/// `per_template` available units for every template in the catalog.
pub fn stocked_units(templates: &[CardTemplate], per_template: usize) -> Vec<InventoryUnit> {
    let mut units = Vec::new();
    for t in templates {
        for n in 0..per_template {
            units.push(InventoryUnit::available(
                format!("unit-{}-{n}", t.template_id),
                t.template_id,
                t.rarity,
            ));
        }
    }
    units
}

/// Engine over in-memory stores with the given catalog and stock level.
pub fn fixture_with(templates: Vec<CardTemplate>, per_template: usize) -> Fixture {
    let units = stocked_units(&templates, per_template);
    let catalog = Arc::new(MemoryCatalog::with_templates(templates));
    let inventory = Arc::new(MemoryInventoryStore::with_units(units));
    let sessions = Arc::new(MemorySessionStore::new());

    let engine = Arc::new(PackEngine::new(
        &EngineConfig::new(SECRET),
        Arc::clone(&catalog) as Arc<dyn CatalogStore>,
        Arc::clone(&inventory) as Arc<dyn InventoryStore>,
        Arc::clone(&sessions) as Arc<dyn SessionStore>,
    ));

    Fixture {
        engine,
        catalog,
        inventory,
        sessions,
    }
}

/// Well-stocked default fixture: three templates per rarity, ten units each.
pub fn fixture() -> Fixture {
    fixture_with(full_catalog(3), 10)
}
