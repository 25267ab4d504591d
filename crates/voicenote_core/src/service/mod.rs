//! Core use-case services.
//!
//! # Responsibility
//! - Own session state and route every mutation through persistence.
//! - Keep hosts decoupled from storage details.

pub mod note_store;
