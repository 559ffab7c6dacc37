//! Provably-fair pack generation and session lifecycle engine.
//!
//! packvault issues randomized packs of collectible cards against a
//! commit-reveal randomness scheme, reserves physical inventory for the
//! duration of a user decision window, and prepares the data an external
//! settlement layer consumes to finalize the outcome.
//!
//! The operation surface lives on [`PackEngine`]: `preview`, `build`,
//! `accept`, `reject`, `admin_settle` and `sweep_expired`. Everything a
//! caller needs to audit an outcome — commitment, nonce, reveal proof — is
//! returned alongside the lineup.

// Module declarations - expose all modules through the library
pub mod catalog;
pub mod commitments;
pub mod config;
pub mod core;
pub mod pricing;
pub mod types;

// Re-export key components for easier access
pub use crate::catalog::{CatalogStore, MemoryCatalog};
pub use crate::commitments::CommitmentAuthority;
pub use crate::config::EngineConfig;
pub use crate::core::inventory::{
    InventoryStore, MemoryInventoryStore, ReserveRequest, SqlInventoryStore,
};
pub use crate::core::resolver::ResolvedSlot;
pub use crate::core::sampler::{SlotKind, SlotLayout, BOOSTER_V1};
pub use crate::core::session::{
    BuiltPack, MemorySessionStore, PackEngine, PackPreview, SessionStore, SqlSessionStore,
};
pub use crate::pricing::PriceTable;
pub use crate::types::error::{PackVaultError, Result};
pub use crate::types::{
    CardTemplate, Currency, InventoryUnit, PackSession, Rarity, SessionState, SettlementHandoff,
    UnitStatus,
};

/// Returns the version of the crate
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
