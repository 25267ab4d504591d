//! Session note store.
//!
//! # Responsibility
//! - Hold the authoritative newest-first note list for the session.
//! - Persist the full list after every mutation.
//!
//! # Invariants
//! - Note ids are unique within the list.
//! - New notes are inserted at index 0.
//! - Startup never fails; unreadable storage degrades to an empty list.

use crate::model::note::{Note, NoteId};
use crate::repo::note_persistence::{NotePersistence, PersistenceError};
use crate::search::filter::filter_notes;
use crate::storage::KeyValueStore;
use log::{info, warn};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store error for note mutations.
#[derive(Debug)]
pub enum StoreError {
    /// Mirroring the list to storage failed. The mutation was rolled back.
    Persistence(PersistenceError),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Persistence(err) => write!(f, "failed to persist notes: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Persistence(err) => Some(err),
        }
    }
}

impl From<PersistenceError> for StoreError {
    fn from(value: PersistenceError) -> Self {
        Self::Persistence(value)
    }
}

/// In-memory note list mirrored to a key-value store.
pub struct NoteStore<K: KeyValueStore> {
    notes: Vec<Note>,
    persistence: NotePersistence<K>,
}

impl<K: KeyValueStore> NoteStore<K> {
    /// Rehydrates the store from `storage`.
    ///
    /// Absent, malformed or unreadable data starts an empty session.
    pub fn initialize(storage: K) -> Self {
        let persistence = NotePersistence::new(storage);
        let notes = match persistence.load() {
            Ok(Some(notes)) => dedupe_ids(notes),
            Ok(None) => Vec::new(),
            Err(err) => {
                warn!(
                    "event=store_init module=service status=degraded error_code=load_failed error={}",
                    err
                );
                Vec::new()
            }
        };
        info!(
            "event=store_init module=service status=ok count={}",
            notes.len()
        );
        Self { notes, persistence }
    }

    /// Creates a note at the head of the list and persists the list.
    ///
    /// Callers are responsible for rejecting empty content.
    ///
    /// # Errors
    /// - `Persistence` when the storage write fails; the list is left as it
    ///   was before the call.
    pub fn create(&mut self, content: impl Into<String>) -> Result<Note, StoreError> {
        let note = Note::new(content);
        self.notes.insert(0, note.clone());
        if let Err(err) = self.persist() {
            self.notes.remove(0);
            return Err(err);
        }
        info!(
            "event=note_create module=service status=ok count={}",
            self.notes.len()
        );
        Ok(note)
    }

    /// Removes the note with `id`, if present, and persists the list.
    ///
    /// Unknown ids are not an error; the unchanged list is still written.
    ///
    /// # Errors
    /// - `Persistence` when the storage write fails; the note is restored
    ///   at its previous position.
    pub fn delete(&mut self, id: NoteId) -> Result<(), StoreError> {
        let removed = self
            .notes
            .iter()
            .position(|note| note.id == id)
            .map(|index| (index, self.notes.remove(index)));

        if let Err(err) = self.persist() {
            if let Some((index, note)) = removed {
                self.notes.insert(index, note);
            }
            return Err(err);
        }
        info!(
            "event=note_delete module=service status=ok removed={} count={}",
            removed.is_some(),
            self.notes.len()
        );
        Ok(())
    }

    /// Current snapshot in display order (newest first).
    pub fn list(&self) -> &[Note] {
        &self.notes
    }

    /// Notes matching `query`, as shown on render.
    pub fn visible(&self, query: &str) -> Vec<&Note> {
        filter_notes(query, &self.notes)
    }

    pub fn get(&self, id: NoteId) -> Option<&Note> {
        self.notes.iter().find(|note| note.id == id)
    }

    pub fn len(&self) -> usize {
        self.notes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notes.is_empty()
    }

    /// Borrows the storage backend behind the persistence adapter.
    pub fn storage(&self) -> &K {
        self.persistence.storage()
    }

    /// Ends the session and hands back the storage backend.
    pub fn into_storage(self) -> K {
        self.persistence.into_storage()
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        if let Err(err) = self.persistence.save(&self.notes) {
            warn!(
                "event=store_persist module=service status=error count={} error={}",
                self.notes.len(),
                err
            );
            return Err(err.into());
        }
        Ok(())
    }
}

/// Keeps the first occurrence of each id so the uniqueness invariant holds
/// even for hand-edited storage.
fn dedupe_ids(notes: Vec<Note>) -> Vec<Note> {
    let mut seen = HashSet::with_capacity(notes.len());
    let total = notes.len();
    let unique: Vec<Note> = notes.into_iter().filter(|note| seen.insert(note.id)).collect();
    if unique.len() != total {
        warn!(
            "event=store_init module=service status=degraded error_code=duplicate_ids dropped={}",
            total - unique.len()
        );
    }
    unique
}
