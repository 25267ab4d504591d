//! Note list persistence over a single storage slot.
//!
//! # Responsibility
//! - Mirror the note list into the `notes` key after each mutation.
//! - Decode the stored list at startup.
//!
//! # Invariants
//! - The adapter never retains notes; it only writes point-in-time copies.
//! - Stored order is the list order handed to `save`.

use crate::model::note::Note;
use crate::storage::{KeyValueStore, StorageError};
use log::{debug, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Storage key holding the serialized note list.
pub const NOTES_STORAGE_KEY: &str = "notes";

pub type PersistenceResult<T> = Result<T, PersistenceError>;

/// Persistence-layer failure.
#[derive(Debug)]
pub enum PersistenceError {
    /// Underlying storage read/write failed.
    Storage(StorageError),
    /// Note list could not be encoded.
    Encode(serde_json::Error),
    /// Stored slot is present but is not a valid note list.
    Malformed(serde_json::Error),
}

impl Display for PersistenceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Storage(err) => write!(f, "{err}"),
            Self::Encode(err) => write!(f, "failed to encode notes: {err}"),
            Self::Malformed(err) => write!(f, "stored notes are malformed: {err}"),
        }
    }
}

impl Error for PersistenceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Storage(err) => Some(err),
            Self::Encode(err) | Self::Malformed(err) => Some(err),
        }
    }
}

impl From<StorageError> for PersistenceError {
    fn from(value: StorageError) -> Self {
        Self::Storage(value)
    }
}

/// Durable mirror of the note list in a key-value store.
pub struct NotePersistence<K: KeyValueStore> {
    storage: K,
}

impl<K: KeyValueStore> NotePersistence<K> {
    pub fn new(storage: K) -> Self {
        Self { storage }
    }

    /// Serializes the full list and overwrites the `notes` slot.
    ///
    /// # Errors
    /// - `Storage` when the backend rejects the write (e.g. quota).
    pub fn save(&mut self, notes: &[Note]) -> PersistenceResult<()> {
        let payload = serde_json::to_string(notes).map_err(PersistenceError::Encode)?;
        self.storage.set(NOTES_STORAGE_KEY, &payload)?;
        debug!(
            "event=notes_save module=repo status=ok count={} bytes={}",
            notes.len(),
            payload.len()
        );
        Ok(())
    }

    /// Reads and decodes the `notes` slot.
    ///
    /// Returns `Ok(None)` when nothing has been stored yet.
    ///
    /// # Errors
    /// - `Malformed` when the slot does not hold a JSON note array.
    /// - `Storage` when the backend read fails.
    pub fn load(&self) -> PersistenceResult<Option<Vec<Note>>> {
        let Some(payload) = self.storage.get(NOTES_STORAGE_KEY)? else {
            return Ok(None);
        };

        match serde_json::from_str::<Vec<Note>>(&payload) {
            Ok(notes) => Ok(Some(notes)),
            Err(err) => {
                warn!(
                    "event=notes_load module=repo status=error error_code=malformed bytes={} error={}",
                    payload.len(),
                    err
                );
                Err(PersistenceError::Malformed(err))
            }
        }
    }

    /// Borrows the underlying storage backend.
    pub fn storage(&self) -> &K {
        &self.storage
    }

    /// Consumes the adapter and returns the storage backend.
    pub fn into_storage(self) -> K {
        self.storage
    }
}
