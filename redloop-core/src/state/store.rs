//! Persistent run memory backed by sqlite
//!
//! The orchestrator writes distilled findings here between runs; the CLI
//! exposes it for inspection and wiping.

use std::path::Path;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS store (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    namespace TEXT NOT NULL,
    key TEXT NOT NULL,
    value TEXT NOT NULL,
    created_at TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_store_namespace ON store(namespace, created_at);
";

/// A stored memory row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryRecord {
    pub namespace: String,
    pub key: String,
    pub value: String,
    pub created_at: DateTime<Utc>,
}

/// Sqlite-backed key/value memory, namespaced per target
pub struct MemoryStore {
    conn: Connection,
}

impl MemoryStore {
    /// Open (or create) the store at the given path
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let conn = Connection::open(path)?;
        conn.execute_batch(SCHEMA)?;
        debug!(path = %path.display(), "opened memory store");
        Ok(Self { conn })
    }

    /// Open an in-memory store, used in tests
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Insert a record under a namespace
    pub fn put(&self, namespace: &str, key: &str, value: &str) -> Result<()> {
        self.conn.execute(
            "INSERT INTO store (namespace, key, value, created_at) VALUES (?1, ?2, ?3, ?4)",
            params![namespace, key, value, Utc::now().to_rfc3339()],
        )?;
        Ok(())
    }

    /// Most recent records in a namespace, newest first
    pub fn search(&self, namespace: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT namespace, key, value, created_at FROM store
             WHERE namespace = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![namespace, limit as i64], row_to_record)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Every record in the store, newest first
    pub fn all(&self) -> Result<Vec<MemoryRecord>> {
        let mut stmt = self.conn.prepare(
            "SELECT namespace, key, value, created_at FROM store
             ORDER BY created_at DESC, id DESC",
        )?;
        let rows = stmt.query_map([], row_to_record)?;
        rows.collect::<std::result::Result<Vec<_>, _>>()
            .map_err(Into::into)
    }

    /// Number of stored records
    pub fn len(&self) -> Result<usize> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM store", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    /// True when the store holds no records
    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }

    /// Delete every record
    pub fn wipe(&self) -> Result<usize> {
        let deleted = self.conn.execute("DELETE FROM store", [])?;
        Ok(deleted)
    }
}

fn row_to_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<MemoryRecord> {
    let created_at: String = row.get(3)?;
    Ok(MemoryRecord {
        namespace: row.get(0)?,
        key: row.get(1)?,
        value: row.get(2)?,
        created_at: created_at
            .parse::<DateTime<Utc>>()
            .unwrap_or_else(|_| Utc::now()),
    })
}
