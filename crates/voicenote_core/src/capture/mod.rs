//! Note capture surface.
//!
//! # Responsibility
//! - Turn typed text or a live transcription stream into note content.
//! - Gate audio capture on an injected speech capability.
//! - Report user-facing outcomes through a notice sink.
//!
//! # Invariants
//! - A recognizer handle exists only while the surface is recording.
//! - Empty content is never saved.

pub mod notice;
pub mod speech;
pub mod surface;
