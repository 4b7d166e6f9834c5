//! Armery item normalization and compression.
//!
//! Items enter the database as arbitrary text. This crate provides the two
//! transformations applied before anything reaches the trie:
//! - normalization (whitespace collapsing and case folding), which defines
//!   item identity, and
//! - compression, a bijective re-encoding of a normalized item as a shorter
//!   byte string over the configured alphabet.

pub mod compress;
pub mod normalize;

pub use compress::ItemCodec;
pub use normalize::{fold_case, normalize_item};
