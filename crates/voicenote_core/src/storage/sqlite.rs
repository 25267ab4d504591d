//! SQLite-backed durable storage slot.
//!
//! # Invariants
//! - Values live in `kv_entries`, one row per key.
//! - Writes are single-statement upserts, so a failed write leaves the
//!   previous value intact.

use super::schema::{open_storage_file, open_storage_in_memory};
use super::{KeyValueStore, StorageError, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::path::Path;

/// Durable key-value store over a migrated SQLite connection.
pub struct SqliteKeyValueStore {
    conn: Connection,
}

impl SqliteKeyValueStore {
    /// Opens (or creates) a storage file and applies migrations.
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        Self::try_new(open_storage_file(path)?)
    }

    /// Opens a throwaway in-memory database.
    pub fn open_in_memory() -> StorageResult<Self> {
        Self::try_new(open_storage_in_memory()?)
    }

    /// Wraps an already migrated connection.
    ///
    /// # Errors
    /// - `MissingTable` when `kv_entries` has not been created.
    pub fn try_new(conn: Connection) -> StorageResult<Self> {
        let exists: i64 = conn.query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = 'kv_entries'
            );",
            [],
            |row| row.get(0),
        )?;
        if exists != 1 {
            return Err(StorageError::MissingTable("kv_entries"));
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        debug!(
            "event=kv_set module=storage status=ok key={} bytes={}",
            key,
            value.len()
        );
        Ok(())
    }
}
