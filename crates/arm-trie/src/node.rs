//! Trie nodes and canonical child ordering.

use arm_codec::fold_case;
use std::collections::BTreeMap;

/// Index of a node in the trie arena.
pub type NodeId = usize;

/// The root always occupies slot 0 of the arena.
pub const ROOT: NodeId = 0;

/// Sibling group: consequents sort before antecedents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) enum ItemRank {
    Consequent,
    Antecedent,
}

/// Ordering key for one child edge.
///
/// Derived ordering is (rank, folded, compressed): consequents first, then
/// case-folded uncompressed form ascending, with the compressed form as a
/// deterministic tiebreak for case-sensitive databases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub(crate) struct ChildKey {
    pub(crate) rank: ItemRank,
    pub(crate) folded: Box<str>,
    pub(crate) compressed: Box<[u8]>,
}

/// One item of a canonical transaction, ready for trie operations: the
/// normalized form plus everything derived from it once up front.
#[derive(Debug, Clone)]
pub struct PreparedItem {
    normalized: String,
    key: ChildKey,
}

impl PreparedItem {
    /// Bundle a normalized item with its compressed form and role.
    pub fn new(normalized: impl Into<String>, compressed: Vec<u8>, is_consequent: bool) -> Self {
        let normalized = normalized.into();
        let key = ChildKey {
            rank: if is_consequent {
                ItemRank::Consequent
            } else {
                ItemRank::Antecedent
            },
            folded: fold_case(&normalized).into_boxed_str(),
            compressed: compressed.into_boxed_slice(),
        };
        PreparedItem { normalized, key }
    }

    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    pub fn compressed(&self) -> &[u8] {
        &self.key.compressed
    }

    pub fn is_consequent(&self) -> bool {
        self.key.rank == ItemRank::Consequent
    }

    pub(crate) fn key(&self) -> &ChildKey {
        &self.key
    }
}

/// One node of the itemsets trie.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    /// Compressed item on the edge into this node; empty at the root.
    pub(crate) compressed: Box<[u8]>,
    pub(crate) is_consequent: bool,
    /// Non-owning back-reference for path reconstruction; `None` at the root.
    pub(crate) parent: Option<NodeId>,
    /// Transactions whose canonicalised powerset contains this path.
    pub(crate) occurrences: u64,
    /// Owned children in canonical sibling order.
    pub(crate) children: BTreeMap<ChildKey, NodeId>,
}

impl Node {
    pub(crate) fn root() -> Self {
        Node {
            compressed: Box::default(),
            is_consequent: false,
            parent: None,
            occurrences: 0,
            children: BTreeMap::new(),
        }
    }

    pub(crate) fn child(compressed: Box<[u8]>, is_consequent: bool, parent: NodeId) -> Self {
        Node {
            compressed,
            is_consequent,
            parent: Some(parent),
            occurrences: 0,
            children: BTreeMap::new(),
        }
    }
}
