//! Engine configuration.
//!
//! Loaded once at startup from a TOML file, or constructed programmatically
//! by embedders and tests. The secret seed fixed here anchors the published
//! commitment; changing it between runs invalidates reproducibility of every
//! session built under the old seed.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::types::error::{PackVaultError, Result};

/// Default decision window for a pending session, in seconds.
pub const DEFAULT_SESSION_TTL_SECS: i64 = 3_600;

/// Engine configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Process-wide secret seed for the commitment authority.
    pub secret_seed: String,

    /// Decision window for pending sessions, in seconds.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_secs: i64,

    /// SQLite database path for the SQL-backed stores. `None` means the
    /// embedder wires its own stores (typically in-memory).
    #[serde(default)]
    pub database_path: Option<String>,
}

fn default_session_ttl() -> i64 {
    DEFAULT_SESSION_TTL_SECS
}

impl EngineConfig {
    /// Configuration with the default decision window and no database path.
    pub fn new(secret_seed: impl Into<String>) -> Self {
        Self {
            secret_seed: secret_seed.into(),
            session_ttl_secs: DEFAULT_SESSION_TTL_SECS,
            database_path: None,
        }
    }

    /// Override the decision window.
    pub fn with_session_ttl(mut self, ttl_secs: i64) -> Self {
        self.session_ttl_secs = ttl_secs;
        self
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = fs::read_to_string(path.as_ref()).map_err(|e| {
            PackVaultError::Config(format!(
                "failed to read {}: {e}",
                path.as_ref().display()
            ))
        })?;
        let config: EngineConfig = toml::from_str(&raw)
            .map_err(|e| PackVaultError::Config(format!("failed to parse config: {e}")))?;
        Ok(config)
    }
}
