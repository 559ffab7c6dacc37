//! SQLite session backend.
//!
//! Check-then-insert and compare-and-set both run inside one transaction, so
//! the one-pending-session-per-wallet invariant and the terminal-state
//! closure hold against any other connection to the same database.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;

use crate::core::session::SessionStore;
use crate::types::error::{PackVaultError, Result};
use crate::types::session_types::{PackSession, SessionState};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS pack_sessions (
    session_id       TEXT PRIMARY KEY,
    wallet           TEXT NOT NULL,
    pack_type        TEXT NOT NULL,
    currency         TEXT NOT NULL,
    rarities         TEXT NOT NULL,
    unit_ids         TEXT NOT NULL,
    commitment       TEXT NOT NULL,
    nonce            TEXT NOT NULL,
    proof            TEXT NOT NULL,
    state            TEXT NOT NULL,
    created_at       INTEGER NOT NULL,
    expires_at       INTEGER NOT NULL,
    composition_hash BLOB NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_sessions_wallet_state
    ON pack_sessions (wallet, state);
";

/// SQLite-backed session store.
pub struct SqlSessionStore {
    conn: Mutex<Connection>,
}

impl SqlSessionStore {
    /// Open (and initialize) a store at the given database path.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_connection(Connection::open(path)?)
    }

    /// Open an in-memory store, mainly for tests.
    pub fn open_in_memory() -> Result<Self> {
        Self::from_connection(Connection::open_in_memory()?)
    }

    fn from_connection(conn: Connection) -> Result<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn row_to_session(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawSession> {
        Ok(RawSession {
            session_id: row.get(0)?,
            wallet: row.get(1)?,
            pack_type: row.get(2)?,
            currency: row.get(3)?,
            rarities: row.get(4)?,
            unit_ids: row.get(5)?,
            commitment: row.get(6)?,
            nonce: row.get(7)?,
            proof: row.get(8)?,
            state: row.get(9)?,
            created_at: row.get(10)?,
            expires_at: row.get(11)?,
            composition_hash: row.get(12)?,
        })
    }
}

/// Row image before JSON columns are decoded.
struct RawSession {
    session_id: String,
    wallet: String,
    pack_type: String,
    currency: String,
    rarities: String,
    unit_ids: String,
    commitment: String,
    nonce: String,
    proof: String,
    state: String,
    created_at: i64,
    expires_at: i64,
    composition_hash: Vec<u8>,
}

impl RawSession {
    fn decode(self) -> Result<PackSession> {
        let state = SessionState::parse(&self.state).ok_or_else(|| {
            PackVaultError::Serialization(format!("unknown session state: {}", self.state))
        })?;
        Ok(PackSession {
            session_id: self.session_id,
            wallet: self.wallet,
            pack_type: self.pack_type,
            currency: serde_json::from_str(&self.currency)?,
            rarities: serde_json::from_str(&self.rarities)?,
            unit_ids: serde_json::from_str(&self.unit_ids)?,
            commitment: self.commitment,
            nonce: self.nonce,
            proof: self.proof,
            state,
            created_at: self.created_at,
            expires_at: self.expires_at,
            composition_hash: self.composition_hash,
        })
    }
}

const SELECT_COLUMNS: &str = "session_id, wallet, pack_type, currency, rarities, unit_ids,
     commitment, nonce, proof, state, created_at, expires_at, composition_hash";

impl SessionStore for SqlSessionStore {
    fn insert_pending(&self, session: PackSession, now: i64) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let active: i64 = tx.query_row(
            "SELECT COUNT(*) FROM pack_sessions
             WHERE wallet = ?1 AND state = 'pending' AND expires_at >= ?2",
            params![session.wallet, now],
            |row| row.get(0),
        )?;
        if active > 0 {
            return Err(PackVaultError::ActiveSessionExists {
                wallet: session.wallet,
            });
        }

        tx.execute(
            "INSERT INTO pack_sessions
                 (session_id, wallet, pack_type, currency, rarities, unit_ids,
                  commitment, nonce, proof, state, created_at, expires_at,
                  composition_hash)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
            params![
                session.session_id,
                session.wallet,
                session.pack_type,
                serde_json::to_string(&session.currency)?,
                serde_json::to_string(&session.rarities)?,
                serde_json::to_string(&session.unit_ids)?,
                session.commitment,
                session.nonce,
                session.proof,
                session.state.as_str(),
                session.created_at,
                session.expires_at,
                session.composition_hash,
            ],
        )?;
        tx.commit()?;
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Option<PackSession>> {
        let conn = self.conn.lock();
        let raw = conn
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM pack_sessions WHERE session_id = ?1"),
                params![session_id],
                Self::row_to_session,
            )
            .optional()?;
        raw.map(RawSession::decode).transpose()
    }

    fn transition(
        &self,
        session_id: &str,
        from: SessionState,
        to: SessionState,
    ) -> Result<PackSession> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM pack_sessions WHERE session_id = ?1"),
                params![session_id],
                Self::row_to_session,
            )
            .optional()?
            .ok_or_else(|| PackVaultError::SessionNotFound(session_id.to_string()))?;
        let mut session = raw.decode()?;

        if session.state != from {
            return Err(PackVaultError::InvalidState {
                current: session.state,
            });
        }

        tx.execute(
            "UPDATE pack_sessions SET state = ?2 WHERE session_id = ?1 AND state = ?3",
            params![session_id, to.as_str(), from.as_str()],
        )?;
        tx.commit()?;

        session.state = to;
        Ok(session)
    }

    fn force_state(&self, session_id: &str, to: SessionState) -> Result<PackSession> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

        let raw = tx
            .query_row(
                &format!("SELECT {SELECT_COLUMNS} FROM pack_sessions WHERE session_id = ?1"),
                params![session_id],
                Self::row_to_session,
            )
            .optional()?
            .ok_or_else(|| PackVaultError::SessionNotFound(session_id.to_string()))?;
        let prior = raw.decode()?;

        tx.execute(
            "UPDATE pack_sessions SET state = ?2 WHERE session_id = ?1",
            params![session_id, to.as_str()],
        )?;
        tx.commit()?;

        Ok(prior)
    }

    fn expired_pending(&self, now: i64) -> Result<Vec<PackSession>> {
        let conn = self.conn.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {SELECT_COLUMNS} FROM pack_sessions
             WHERE state = 'pending' AND expires_at < ?1"
        ))?;
        let rows = stmt.query_map(params![now], Self::row_to_session)?;

        let mut sessions = Vec::new();
        for raw in rows {
            sessions.push(raw?.decode()?);
        }
        Ok(sessions)
    }
}
