//! SQLite connection bootstrap for the durable storage slot.
//!
//! # Invariants
//! - Schema revisions are applied in order inside one transaction.
//! - The applied revision is mirrored to `PRAGMA user_version`.
//! - A file written by a newer build is refused, never downgraded.

use super::{StorageError, StorageResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

/// Ordered schema revisions; index + 1 is the revision number.
const SCHEMA_REVISIONS: &[&str] = &[include_str!("sql/0001_kv_entries.sql")];

/// Newest schema revision this build can read and write.
pub fn latest_schema_version() -> u32 {
    SCHEMA_REVISIONS.len() as u32
}

/// Revision currently recorded in the connection's `user_version`.
pub fn schema_version(conn: &Connection) -> StorageResult<u32> {
    Ok(conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?)
}

/// Opens (or creates) a storage file with the schema brought up to date.
pub fn open_storage_file(path: impl AsRef<Path>) -> StorageResult<Connection> {
    let path = path.as_ref();
    bootstrap("file", || Connection::open(path))
}

/// Opens a throwaway in-memory database with the schema applied.
pub fn open_storage_in_memory() -> StorageResult<Connection> {
    bootstrap("memory", Connection::open_in_memory)
}

fn bootstrap(
    mode: &'static str,
    connect: impl FnOnce() -> rusqlite::Result<Connection>,
) -> StorageResult<Connection> {
    let started_at = Instant::now();
    let result = connect()
        .map_err(StorageError::from)
        .and_then(|mut conn| {
            conn.busy_timeout(Duration::from_secs(5))?;
            upgrade_schema(&mut conn)?;
            Ok(conn)
        });

    match &result {
        Ok(_) => info!(
            "event=storage_open module=storage status=ok mode={} duration_ms={}",
            mode,
            started_at.elapsed().as_millis()
        ),
        Err(err) => error!(
            "event=storage_open module=storage status=error mode={} duration_ms={} error={}",
            mode,
            started_at.elapsed().as_millis(),
            err
        ),
    }
    result
}

fn upgrade_schema(conn: &mut Connection) -> StorageResult<()> {
    let found = schema_version(conn)?;
    let supported = latest_schema_version();
    if found > supported {
        return Err(StorageError::SchemaTooNew { found, supported });
    }
    if found == supported {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for (revision, sql) in (1..).zip(SCHEMA_REVISIONS).skip(found as usize) {
        tx.execute_batch(sql)?;
        tx.pragma_update(None, "user_version", revision)?;
    }
    tx.commit()?;

    info!(
        "event=storage_upgrade module=storage status=ok from_version={} to_version={}",
        found, supported
    );
    Ok(())
}
