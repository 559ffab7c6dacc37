//! Catalog access for template resolution.
//!
//! The catalog is a read-only collaborator from the engine's perspective:
//! templates are created by catalog import and the engine only queries them
//! by rarity or energy flag. Implementations must return subsets in a stable
//! order (ascending template id) — the resolver turns a uniform draw into an
//! index into that order, so an unstable order would break replay.

use parking_lot::RwLock;
use std::collections::HashMap;

use crate::types::catalog_types::{CardTemplate, Rarity};

/// Read-only catalog queries used during template resolution.
pub trait CatalogStore: Send + Sync {
    /// Templates eligible for a slot of the given rarity, ascending by
    /// template id. For [`Rarity::Energy`] this is the energy-flagged subset;
    /// for every other rarity the energy-flagged templates are excluded.
    fn templates_for_rarity(&self, rarity: Rarity) -> Vec<CardTemplate>;

    /// Point lookup by template id.
    fn get_template(&self, template_id: u64) -> Option<CardTemplate>;
}

/// In-memory catalog backed by a template map.
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    templates: RwLock<HashMap<u64, CardTemplate>>,
}

impl MemoryCatalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog pre-loaded with imported templates.
    pub fn with_templates(templates: Vec<CardTemplate>) -> Self {
        let catalog = Self::new();
        catalog.import(templates);
        catalog
    }

    /// Import templates, replacing any existing entry with the same id.
    pub fn import(&self, templates: Vec<CardTemplate>) {
        let mut map = self.templates.write();
        for template in templates {
            map.insert(template.template_id, template);
        }
    }

    /// Number of templates in the catalog.
    pub fn len(&self) -> usize {
        self.templates.read().len()
    }

    /// Whether the catalog holds no templates.
    pub fn is_empty(&self) -> bool {
        self.templates.read().is_empty()
    }
}

impl CatalogStore for MemoryCatalog {
    fn templates_for_rarity(&self, rarity: Rarity) -> Vec<CardTemplate> {
        let map = self.templates.read();
        let mut subset: Vec<CardTemplate> = map
            .values()
            .filter(|t| {
                if rarity == Rarity::Energy {
                    t.is_energy
                } else {
                    !t.is_energy && t.rarity == rarity
                }
            })
            .cloned()
            .collect();
        subset.sort_by_key(|t| t.template_id);
        subset
    }

    fn get_template(&self, template_id: u64) -> Option<CardTemplate> {
        self.templates.read().get(&template_id).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn template(id: u64, rarity: Rarity, is_energy: bool) -> CardTemplate {
        CardTemplate {
            template_id: id,
            name: format!("card-{id}"),
            rarity,
            variant: None,
            set_code: "base".to_string(),
            is_energy,
        }
    }

    #[test]
    fn rarity_subsets_are_ordered_by_template_id() {
        let catalog = MemoryCatalog::with_templates(vec![
            template(30, Rarity::Common, false),
            template(10, Rarity::Common, false),
            template(20, Rarity::Common, false),
            template(40, Rarity::Rare, false),
        ]);
        let commons = catalog.templates_for_rarity(Rarity::Common);
        let ids: Vec<u64> = commons.iter().map(|t| t.template_id).collect();
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[test]
    fn energy_slot_draws_only_energy_templates() {
        let catalog = MemoryCatalog::with_templates(vec![
            template(1, Rarity::Common, false),
            template(2, Rarity::Common, true),
        ]);
        let energy = catalog.templates_for_rarity(Rarity::Energy);
        assert_eq!(energy.len(), 1);
        assert_eq!(energy[0].template_id, 2);

        // Energy-flagged templates never leak into rarity subsets.
        let commons = catalog.templates_for_rarity(Rarity::Common);
        assert_eq!(commons.len(), 1);
        assert_eq!(commons[0].template_id, 1);
    }

    #[test]
    fn missing_rarity_yields_empty_subset() {
        let catalog = MemoryCatalog::with_templates(vec![template(1, Rarity::Common, false)]);
        assert!(catalog.templates_for_rarity(Rarity::DoubleRare).is_empty());
    }
}
