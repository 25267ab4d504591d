//! Persistence adapters between domain records and key-value storage.
//!
//! # Responsibility
//! - Serialize the full note list into one storage slot.
//! - Keep the wire shape (JSON array, newest first) inside core.
//!
//! # Invariants
//! - Every save writes the complete list; there are no partial updates.
//! - Malformed slot contents surface as a typed error, never a panic.

pub mod note_persistence;
