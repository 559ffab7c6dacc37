//! Inventory unit types.
//!
//! An inventory unit is one physical, allocatable instance backing a card
//! template. Units are created by inventory provisioning and only ever change
//! status through the reservation store; they are never destroyed.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::types::catalog_types::Rarity;

/// Ownership status of an inventory unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnitStatus {
    /// Free for reservation; belongs to no session.
    Available,
    /// Claimed by exactly one pending pack session.
    Reserved,
    /// Transferred to a user after an accepted session.
    UserOwned,
    /// Listed on a secondary surface; not allocatable.
    Listed,
}

impl UnitStatus {
    /// Stable string form used for persistence.
    pub fn as_str(&self) -> &'static str {
        match self {
            UnitStatus::Available => "available",
            UnitStatus::Reserved => "reserved",
            UnitStatus::UserOwned => "user_owned",
            UnitStatus::Listed => "listed",
        }
    }

    /// Parse the stable string form back into a status.
    pub fn parse(s: &str) -> Option<UnitStatus> {
        match s {
            "available" => Some(UnitStatus::Available),
            "reserved" => Some(UnitStatus::Reserved),
            "user_owned" => Some(UnitStatus::UserOwned),
            "listed" => Some(UnitStatus::Listed),
            _ => None,
        }
    }
}

impl fmt::Display for UnitStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One physical instance of a card template.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryUnit {
    /// Unique identifier of this unit.
    pub unit_id: String,

    /// Catalog template this unit instantiates.
    pub template_id: u64,

    /// Rarity, denormalized from the template for settlement pricing.
    pub rarity: Rarity,

    /// Current ownership status.
    pub status: UnitStatus,

    /// Wallet currently holding or reserving this unit, if any.
    pub owner: Option<String>,

    /// Unix timestamp of the last status change.
    pub updated_at: i64,
}

impl InventoryUnit {
    /// Create a fresh available unit for a template.
    pub fn available(unit_id: impl Into<String>, template_id: u64, rarity: Rarity) -> Self {
        Self {
            unit_id: unit_id.into(),
            template_id,
            rarity,
            status: UnitStatus::Available,
            owner: None,
            updated_at: chrono::Utc::now().timestamp(),
        }
    }
}
