//! Domain model for captured notes.
//!
//! # Responsibility
//! - Define the note record shared by store, persistence and search.
//!
//! # Invariants
//! - Every note is identified by a stable `NoteId`.
//! - Deletion is a hard removal from the list; there are no tombstones.

pub mod note;
