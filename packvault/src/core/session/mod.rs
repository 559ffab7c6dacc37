//! Session ledger: persistence contract and lifecycle engine.
//!
//! The ledger records each pack session's composition, proof material and
//! lifecycle state. Its two store invariants carry the same atomicity weight
//! as inventory reservation:
//!
//! * one non-expired pending session per wallet, enforced by an indivisible
//!   check-then-insert — never a separate read followed by a separate write
//! * terminal transitions as compare-and-set on the current state, so two
//!   racing accept/reject calls can never both succeed

pub mod engine;
pub mod memory_store;
pub mod sql_store;

pub use engine::{BuiltPack, PackEngine, PackPreview};
pub use memory_store::MemorySessionStore;
pub use sql_store::SqlSessionStore;

use crate::types::error::Result;
use crate::types::session_types::{PackSession, SessionState};

/// Persistence contract for pack sessions.
pub trait SessionStore: Send + Sync {
    /// Insert a new pending session, atomically refusing the insert when the
    /// wallet already holds a pending session that has not expired by `now`.
    fn insert_pending(&self, session: PackSession, now: i64) -> Result<()>;

    /// Point lookup by session id.
    fn get(&self, session_id: &str) -> Result<Option<PackSession>>;

    /// Compare-and-set state transition.
    ///
    /// Fails with `SessionNotFound` when the session does not exist and with
    /// `InvalidState` when its current state is not `from`. Returns the
    /// updated session.
    fn transition(
        &self,
        session_id: &str,
        from: SessionState,
        to: SessionState,
    ) -> Result<PackSession>;

    /// Unconditional state change, bypassing the current-state check.
    ///
    /// Returns the session as it was before the change so the caller can
    /// compensate (release units) based on the prior state. Only
    /// `SessionNotFound` fails it.
    fn force_state(&self, session_id: &str, to: SessionState) -> Result<PackSession>;

    /// Pending sessions whose expiry has elapsed by `now`.
    fn expired_pending(&self, now: i64) -> Result<Vec<PackSession>>;
}
