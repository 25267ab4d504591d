//! Origin-scoped key-value storage backends.
//!
//! # Responsibility
//! - Define the synchronous string slot contract used by note persistence.
//! - Provide in-memory and SQLite-backed implementations.
//!
//! # Invariants
//! - `set` fully overwrites any previous value under the same key.
//! - `get` returns exactly the last value written, or `None`.

mod memory;
pub mod schema;
mod sqlite;

pub use memory::MemoryKeyValueStore;
pub use sqlite::SqliteKeyValueStore;

use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Storage-layer failure.
#[derive(Debug)]
pub enum StorageError {
    /// Writing the value would exceed the backend's capacity.
    QuotaExceeded {
        key: String,
        required_bytes: usize,
        quota_bytes: usize,
    },
    /// Backend table is missing; connection was not migrated.
    MissingTable(&'static str),
    /// Storage file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    Sqlite(rusqlite::Error),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, {quota_bytes} allowed"
            ),
            Self::MissingTable(table) => write!(f, "missing required table: {table}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "storage schema version {found} is newer than supported {supported}"
            ),
            Self::Sqlite(err) => write!(f, "{err}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            _ => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}

/// Synchronous string key-value slot store.
pub trait KeyValueStore {
    /// Reads the value stored under `key`.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    /// Writes `value` under `key`, replacing any prior value.
    fn set(&mut self, key: &str, value: &str) -> StorageResult<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for Box<S> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }
}
