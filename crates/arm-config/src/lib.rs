//! Armery database settings.
//!
//! This crate provides the immutable configuration record shared by every
//! database: declared consequents, normalization flags, the antecedent-length
//! cap, output separators, and the item alphabet used by compression.

pub mod settings;

pub use settings::{Settings, PRINTABLE_ALPHABET};
