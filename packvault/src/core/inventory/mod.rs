//! Inventory reservation store.
//!
//! Inventory units are the single shared mutable resource in the engine, so
//! every status transition runs as one indivisible unit of work: two
//! concurrent reservation attempts for the same scarce template must never
//! both claim the same unit, and a reservation that cannot be fully satisfied
//! must leave nothing claimed at all.
//!
//! Two backends implement the store contract:
//!
//! * [`MemoryInventoryStore`] — a mutex-guarded map, for tests and embedding
//! * [`SqlInventoryStore`] — SQLite with one transaction per operation

pub mod memory_store;
pub mod sql_store;

pub use memory_store::MemoryInventoryStore;
pub use sql_store::SqlInventoryStore;

use crate::types::error::Result;
use crate::types::inventory_types::InventoryUnit;

/// One slot's reservation demand: which template, and which slot position to
/// report if the template is out of stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReserveRequest {
    /// Template a unit is needed for.
    pub template_id: u64,
    /// Slot position in the pack layout, zero-based.
    pub slot_index: usize,
}

/// Atomic claim/release/transfer operations over inventory units.
pub trait InventoryStore: Send + Sync {
    /// Add provisioned units to the pool.
    fn insert_units(&self, units: Vec<InventoryUnit>) -> Result<()>;

    /// Point lookup by unit id.
    fn get_unit(&self, unit_id: &str) -> Result<Option<InventoryUnit>>;

    /// Number of units currently available for a template.
    fn count_available(&self, template_id: u64) -> Result<usize>;

    /// Atomically claim one available unit per request for `wallet`.
    ///
    /// All-or-nothing: if any request cannot be satisfied, no unit changes
    /// status and the error carries the failing template and slot. On success
    /// the returned unit ids align with the request order.
    fn reserve(&self, requests: &[ReserveRequest], wallet: &str) -> Result<Vec<String>>;

    /// Return reserved units to the available pool, clearing ownership.
    fn release(&self, unit_ids: &[String]) -> Result<()>;

    /// Hand reserved units over to `wallet` as owned.
    fn transfer(&self, unit_ids: &[String], wallet: &str) -> Result<()>;
}
