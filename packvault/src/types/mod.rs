//! Shared type definitions for the pack engine.

pub mod catalog_types;
pub mod error;
pub mod inventory_types;
pub mod session_types;

pub use catalog_types::{CardTemplate, Rarity};
pub use error::{PackVaultError, Result};
pub use inventory_types::{InventoryUnit, UnitStatus};
pub use session_types::{Currency, PackSession, SessionState, SettlementHandoff};
