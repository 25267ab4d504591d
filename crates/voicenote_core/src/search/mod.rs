//! Note search entry points.
//!
//! # Responsibility
//! - Derive the visible note subset for a query on every render.

pub mod filter;
