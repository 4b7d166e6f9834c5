//! Armery itemsets trie.
//!
//! The trie accumulates the powerset-occurrence counts of inserted
//! transactions under a consequents-first canonical ordering: every path
//! starts with zero or more consequents, followed by antecedents, each group
//! sorted by case-folded uncompressed form. One itemset therefore has exactly
//! one path, every node can answer support/confidence/lift from its counter,
//! and a traversal that only cares about consequents can stop at the first
//! non-consequent sibling.
//!
//! Nodes live in an arena; parents are non-owning indices, children are held
//! in an ordered map that realises the canonical sibling order directly.

pub mod merge;
pub mod node;
pub mod render;
pub mod snapshot;
pub mod trie;
pub mod walk;

pub use node::{NodeId, PreparedItem, ROOT};
pub use snapshot::{NodeSnapshot, TrieSnapshot};
pub use trie::{ItemsetsTrie, MissingItems};
pub use walk::VisitorControl;
