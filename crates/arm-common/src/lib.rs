//! Armery shared types, errors, and schema versioning.
//!
//! This crate provides the foundational pieces shared across the arm-* crates:
//! - The domain error type and `Result` alias
//! - The database schema version gate used by snapshots and merges

pub mod error;
pub mod schema;

pub use error::{Error, Result};
pub use schema::SCHEMA_VERSION;
