//! In-memory inventory backend.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::core::inventory::{InventoryStore, ReserveRequest};
use crate::types::error::{PackVaultError, Result};
use crate::types::inventory_types::{InventoryUnit, UnitStatus};

/// Mutex-guarded unit map. The single lock is the transactional boundary:
/// selection and status flips for a whole reservation happen under one
/// acquisition, so partial claims are never observable.
#[derive(Debug, Default)]
pub struct MemoryInventoryStore {
    units: Mutex<HashMap<String, InventoryUnit>>,
}

impl MemoryInventoryStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-loaded with provisioned units.
    pub fn with_units(units: Vec<InventoryUnit>) -> Self {
        let store = Self::new();
        store
            .insert_units(units)
            .expect("memory insert cannot fail");
        store
    }
}

impl InventoryStore for MemoryInventoryStore {
    fn insert_units(&self, units: Vec<InventoryUnit>) -> Result<()> {
        let mut map = self.units.lock();
        for unit in units {
            map.insert(unit.unit_id.clone(), unit);
        }
        Ok(())
    }

    fn get_unit(&self, unit_id: &str) -> Result<Option<InventoryUnit>> {
        Ok(self.units.lock().get(unit_id).cloned())
    }

    fn count_available(&self, template_id: u64) -> Result<usize> {
        let map = self.units.lock();
        Ok(map
            .values()
            .filter(|u| u.template_id == template_id && u.status == UnitStatus::Available)
            .count())
    }

    fn reserve(&self, requests: &[ReserveRequest], wallet: &str) -> Result<Vec<String>> {
        let mut map = self.units.lock();

        // Selection phase: pick one available unit per request without
        // mutating anything, so a miss rolls the whole call back for free.
        let mut picked: Vec<String> = Vec::with_capacity(requests.len());
        for request in requests {
            let mut candidates: Vec<&InventoryUnit> = map
                .values()
                .filter(|u| {
                    u.template_id == request.template_id
                        && u.status == UnitStatus::Available
                        && !picked.contains(&u.unit_id)
                })
                .collect();
            candidates.sort_by(|a, b| a.unit_id.cmp(&b.unit_id));
            match candidates.first() {
                Some(unit) => picked.push(unit.unit_id.clone()),
                None => {
                    return Err(PackVaultError::OutOfStock {
                        template_id: Some(request.template_id),
                        slot_index: request.slot_index,
                    })
                }
            }
        }

        // Commit phase: every request has a unit, flip them all.
        let now = chrono::Utc::now().timestamp();
        for unit_id in &picked {
            let unit = map.get_mut(unit_id).expect("picked unit exists");
            unit.status = UnitStatus::Reserved;
            unit.owner = Some(wallet.to_string());
            unit.updated_at = now;
        }

        Ok(picked)
    }

    fn release(&self, unit_ids: &[String]) -> Result<()> {
        let mut map = self.units.lock();
        let now = chrono::Utc::now().timestamp();
        for unit_id in unit_ids {
            if let Some(unit) = map.get_mut(unit_id) {
                if unit.status == UnitStatus::Reserved {
                    unit.status = UnitStatus::Available;
                    unit.owner = None;
                    unit.updated_at = now;
                }
            }
        }
        Ok(())
    }

    fn transfer(&self, unit_ids: &[String], wallet: &str) -> Result<()> {
        let mut map = self.units.lock();
        let now = chrono::Utc::now().timestamp();
        for unit_id in unit_ids {
            if let Some(unit) = map.get_mut(unit_id) {
                unit.status = UnitStatus::UserOwned;
                unit.owner = Some(wallet.to_string());
                unit.updated_at = now;
            }
        }
        Ok(())
    }
}
