//! Error handling for the pack engine.
//!
//! Every failure the engine can surface maps to a distinct, stable
//! machine-readable code so transports can let clients distinguish "try a
//! different seed" from "wait or poll" from "too late" without string
//! matching. All errors are local and synchronous; the engine performs no
//! internal retries.

use std::result;
use thiserror::Error;

use crate::types::session_types::SessionState;

/// Result type for pack engine operations.
pub type Result<T> = result::Result<T, PackVaultError>;

/// Error type for pack engine operations.
#[derive(Debug, Error)]
pub enum PackVaultError {
    /// The requested pack type has no registered slot layout.
    #[error("unsupported pack type: {0}")]
    UnsupportedPackType(String),

    /// The wallet already holds a non-expired pending session.
    #[error("wallet {wallet} already has an active pending session")]
    ActiveSessionExists {
        /// Wallet with the outstanding session.
        wallet: String,
    },

    /// A slot could not be backed by an available inventory unit.
    ///
    /// `template_id` is `None` when the catalog had no template at all for
    /// the slot's rarity, so there was nothing to reserve against.
    #[error("out of stock at slot {slot_index} (template {template_id:?})")]
    OutOfStock {
        /// Template that had no available unit, if one was resolved.
        template_id: Option<u64>,
        /// Slot position in the pack layout, zero-based.
        slot_index: usize,
    },

    /// No session exists under the given identifier.
    #[error("session not found: {0}")]
    SessionNotFound(String),

    /// The session belongs to a different wallet.
    #[error("session {session_id} does not belong to wallet {wallet}")]
    WalletMismatch {
        /// Session the caller addressed.
        session_id: String,
        /// Wallet that made the call.
        wallet: String,
    },

    /// The session is not in a state that admits the requested transition.
    #[error("session is in state {current}, transition refused")]
    InvalidState {
        /// State the session was found in.
        current: SessionState,
    },

    /// The session's decision window has elapsed.
    #[error("session {session_id} has expired")]
    SessionExpired {
        /// The expired session.
        session_id: String,
    },

    /// The selected currency needs account material the caller did not supply.
    #[error("selected currency requires a token account that was not supplied")]
    CurrencyAccountsMissing,

    /// Backing store failure.
    #[error("storage error: {0}")]
    Storage(String),

    /// Serialization failure while persisting or loading engine data.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Configuration loading or validation failure.
    #[error("configuration error: {0}")]
    Config(String),
}

impl PackVaultError {
    /// Stable machine-readable code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            PackVaultError::UnsupportedPackType(_) => "unsupported_pack_type",
            PackVaultError::ActiveSessionExists { .. } => "active_session_exists",
            PackVaultError::OutOfStock { .. } => "out_of_stock",
            PackVaultError::SessionNotFound(_) => "session_not_found",
            PackVaultError::WalletMismatch { .. } => "wallet_mismatch",
            PackVaultError::InvalidState { .. } => "invalid_state",
            PackVaultError::SessionExpired { .. } => "session_expired",
            PackVaultError::CurrencyAccountsMissing => "currency_accounts_missing",
            PackVaultError::Storage(_) => "storage_error",
            PackVaultError::Serialization(_) => "serialization_error",
            PackVaultError::Config(_) => "config_error",
        }
    }
}

impl From<rusqlite::Error> for PackVaultError {
    fn from(err: rusqlite::Error) -> Self {
        PackVaultError::Storage(err.to_string())
    }
}

impl From<serde_json::Error> for PackVaultError {
    fn from(err: serde_json::Error) -> Self {
        PackVaultError::Serialization(err.to_string())
    }
}

impl From<toml::de::Error> for PackVaultError {
    fn from(err: toml::de::Error) -> Self {
        PackVaultError::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_are_distinct_per_user_facing_variant() {
        let errors = [
            PackVaultError::UnsupportedPackType("x".to_string()),
            PackVaultError::ActiveSessionExists {
                wallet: "w".to_string(),
            },
            PackVaultError::OutOfStock {
                template_id: Some(7),
                slot_index: 9,
            },
            PackVaultError::SessionNotFound("s".to_string()),
            PackVaultError::WalletMismatch {
                session_id: "s".to_string(),
                wallet: "w".to_string(),
            },
            PackVaultError::InvalidState {
                current: SessionState::Accepted,
            },
            PackVaultError::SessionExpired {
                session_id: "s".to_string(),
            },
            PackVaultError::CurrencyAccountsMissing,
        ];
        let mut codes: Vec<&str> = errors.iter().map(|e| e.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), errors.len());
    }
}
