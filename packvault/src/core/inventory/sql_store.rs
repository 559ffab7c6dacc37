//! SQLite inventory backend.
//!
//! Every store operation runs inside one explicit transaction; a reservation
//! that misses any template drops the transaction, which rolls back the
//! claims already made in that call.

use parking_lot::Mutex;
use rusqlite::{params, Connection, OptionalExtension, TransactionBehavior};
use std::path::Path;

use crate::core::inventory::{InventoryStore, ReserveRequest};
use crate::types::catalog_types::Rarity;
use crate::types::error::{PackVaultError, Result};
use crate::types::inventory_types::{InventoryUnit, UnitStatus};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS inventory_units (
    unit_id     TEXT PRIMARY KEY,
    template_id INTEGER NOT NULL,
    rarity      TEXT NOT NULL,
    status      TEXT NOT NULL,
    owner       TEXT,
    updated_at  INTEGER NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_inventory_template_status
    ON inventory_units (template_id, status);
";

/// SQLite-backed inventory store.
///
/// The connection mutex serializes writers in-process; the per-operation
/// transaction is what makes each reserve/release/transfer indivisible
/// against any other connection to the same database.
pub struct SqlInventoryStore {
    conn: Mutex<Connection>,
}

impl SqlInventoryStore {
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

    fn row_to_unit(row: &rusqlite::Row<'_>) -> rusqlite::Result<InventoryUnit> {
        let rarity: String = row.get(2)?;
        let status: String = row.get(3)?;
        Ok(InventoryUnit {
            unit_id: row.get(0)?,
            template_id: row.get::<_, i64>(1)? as u64,
            rarity: Rarity::parse(&rarity).unwrap_or(Rarity::Common),
            status: UnitStatus::parse(&status).unwrap_or(UnitStatus::Listed),
            owner: row.get(4)?,
            updated_at: row.get(5)?,
        })
    }
}

impl InventoryStore for SqlInventoryStore {
    fn insert_units(&self, units: Vec<InventoryUnit>) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        for unit in units {
            tx.execute(
                "INSERT OR REPLACE INTO inventory_units
                     (unit_id, template_id, rarity, status, owner, updated_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    unit.unit_id,
                    unit.template_id as i64,
                    unit.rarity.as_str(),
                    unit.status.as_str(),
                    unit.owner,
                    unit.updated_at,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn get_unit(&self, unit_id: &str) -> Result<Option<InventoryUnit>> {
        let conn = self.conn.lock();
        let unit = conn
            .query_row(
                "SELECT unit_id, template_id, rarity, status, owner, updated_at
                 FROM inventory_units WHERE unit_id = ?1",
                params![unit_id],
                Self::row_to_unit,
            )
            .optional()?;
        Ok(unit)
    }

    fn count_available(&self, template_id: u64) -> Result<usize> {
        let conn = self.conn.lock();
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM inventory_units
             WHERE template_id = ?1 AND status = 'available'",
            params![template_id as i64],
            |row| row.get(0),
        )?;
        Ok(count as usize)
    }

    fn reserve(&self, requests: &[ReserveRequest], wallet: &str) -> Result<Vec<String>> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = chrono::Utc::now().timestamp();

        let mut picked: Vec<String> = Vec::with_capacity(requests.len());
        for request in requests {
            // Claims earlier in this transaction are already visible to the
            // select, so repeated templates pick distinct units.
            let unit_id: Option<String> = tx
                .query_row(
                    "SELECT unit_id FROM inventory_units
                     WHERE template_id = ?1 AND status = 'available'
                     ORDER BY unit_id LIMIT 1",
                    params![request.template_id as i64],
                    |row| row.get(0),
                )
                .optional()?;

            let unit_id = match unit_id {
                Some(id) => id,
                // Dropping the transaction rolls back every claim made above.
                None => {
                    return Err(PackVaultError::OutOfStock {
                        template_id: Some(request.template_id),
                        slot_index: request.slot_index,
                    })
                }
            };

            tx.execute(
                "UPDATE inventory_units
                 SET status = 'reserved', owner = ?2, updated_at = ?3
                 WHERE unit_id = ?1 AND status = 'available'",
                params![unit_id, wallet, now],
            )?;
            picked.push(unit_id);
        }

        tx.commit()?;
        Ok(picked)
    }

    fn release(&self, unit_ids: &[String]) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = chrono::Utc::now().timestamp();
        for unit_id in unit_ids {
            tx.execute(
                "UPDATE inventory_units
                 SET status = 'available', owner = NULL, updated_at = ?2
                 WHERE unit_id = ?1 AND status = 'reserved'",
                params![unit_id, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn transfer(&self, unit_ids: &[String], wallet: &str) -> Result<()> {
        let mut conn = self.conn.lock();
        let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
        let now = chrono::Utc::now().timestamp();
        for unit_id in unit_ids {
            tx.execute(
                "UPDATE inventory_units
                 SET status = 'user_owned', owner = ?2, updated_at = ?3
                 WHERE unit_id = ?1",
                params![unit_id, wallet, now],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}
