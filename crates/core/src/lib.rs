//! Domain-level building blocks shared by the db and api crates.
//!
//! Framework-free by design: error taxonomy, shared type aliases,
//! amenities parsing, and storage name generation.

pub mod amenities;
pub mod error;
pub mod naming;
pub mod types;
