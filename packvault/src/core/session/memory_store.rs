//! In-memory session backend.

use parking_lot::Mutex;
use std::collections::HashMap;

use crate::core::session::SessionStore;
use crate::types::error::{PackVaultError, Result};
use crate::types::session_types::{PackSession, SessionState};

/// Mutex-guarded session map. Check-then-insert and compare-and-set both run
/// under one lock acquisition.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    sessions: Mutex<HashMap<String, PackSession>>,
}

impl MemorySessionStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn insert_pending(&self, session: PackSession, now: i64) -> Result<()> {
        let mut map = self.sessions.lock();
        let has_active = map.values().any(|s| {
            s.wallet == session.wallet
                && s.state == SessionState::Pending
                && !s.is_expired(now)
        });
        if has_active {
            return Err(PackVaultError::ActiveSessionExists {
                wallet: session.wallet,
            });
        }
        map.insert(session.session_id.clone(), session);
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Option<PackSession>> {
        Ok(self.sessions.lock().get(session_id).cloned())
    }

    fn transition(
        &self,
        session_id: &str,
        from: SessionState,
        to: SessionState,
    ) -> Result<PackSession> {
        let mut map = self.sessions.lock();
        let session = map
            .get_mut(session_id)
            .ok_or_else(|| PackVaultError::SessionNotFound(session_id.to_string()))?;
        if session.state != from {
            return Err(PackVaultError::InvalidState {
                current: session.state,
            });
        }
        session.state = to;
        Ok(session.clone())
    }

    fn force_state(&self, session_id: &str, to: SessionState) -> Result<PackSession> {
        let mut map = self.sessions.lock();
        let session = map
            .get_mut(session_id)
            .ok_or_else(|| PackVaultError::SessionNotFound(session_id.to_string()))?;
        let prior = session.clone();
        session.state = to;
        Ok(prior)
    }

    fn expired_pending(&self, now: i64) -> Result<Vec<PackSession>> {
        let map = self.sessions.lock();
        Ok(map
            .values()
            .filter(|s| s.state == SessionState::Pending && s.is_expired(now))
            .cloned()
            .collect())
    }
}
