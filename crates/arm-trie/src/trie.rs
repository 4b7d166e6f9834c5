//! The itemsets trie: arena, insertion, removal, lookup, and metrics.

use crate::node::{ChildKey, ItemRank, Node, NodeId, PreparedItem, ROOT};
use arm_codec::{fold_case, ItemCodec};
use arm_common::{Error, Result};
use std::collections::BTreeSet;
use tracing::debug;

/// Behavior of [`ItemsetsTrie::get_node_from_compressed`] when a path
/// component has no matching child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingItems {
    /// Fail with [`Error::UnknownItemset`].
    Fail,
    /// Skip the unknown component and continue from the same node.
    Skip,
    /// Return `None` instead of failing.
    ReturnNone,
}

/// Consequents-first canonical trie over the powerset-prefixes of inserted
/// transactions.
#[derive(Debug, Clone)]
pub struct ItemsetsTrie {
    pub(crate) codec: ItemCodec,
    /// Normalized uncompressed consequents; membership decides item rank.
    pub(crate) consequents: BTreeSet<String>,
    pub(crate) max_antecedents_length: Option<usize>,
    /// Separator used when itemsets are rendered into messages.
    pub(crate) item_separator: String,
    pub(crate) nodes: Vec<Node>,
    pub(crate) free: Vec<NodeId>,
    pub(crate) number_transactions: u64,
    /// Allocated node count, including the root.
    pub(crate) number_nodes: u64,
}

impl ItemsetsTrie {
    /// Create an empty trie for the given codec and declared consequents.
    pub fn new(
        codec: ItemCodec,
        consequents: BTreeSet<String>,
        max_antecedents_length: Option<usize>,
        item_separator: impl Into<String>,
    ) -> Self {
        ItemsetsTrie {
            codec,
            consequents,
            max_antecedents_length,
            item_separator: item_separator.into(),
            nodes: vec![Node::root()],
            free: Vec::new(),
            number_transactions: 0,
            number_nodes: 1,
        }
    }

    /// Number of transactions inserted so far.
    pub fn number_transactions(&self) -> u64 {
        self.number_transactions
    }

    /// Number of allocated nodes, including the root.
    pub fn number_nodes(&self) -> u64 {
        self.number_nodes
    }

    /// Whether a normalized uncompressed item is a declared consequent.
    pub fn is_consequent_item(&self, normalized: &str) -> bool {
        self.consequents.contains(normalized)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id].parent
    }

    pub fn is_consequent(&self, id: NodeId) -> bool {
        self.nodes[id].is_consequent
    }

    pub fn occurrences(&self, id: NodeId) -> u64 {
        self.nodes[id].occurrences
    }

    /// Children of a node in canonical sibling order.
    pub fn children_in_order(&self, id: NodeId) -> Vec<NodeId> {
        self.nodes[id].children.values().copied().collect()
    }

    // ------------------------------------------------------------------
    // Insertion and removal
    // ------------------------------------------------------------------

    /// Record one canonical transaction ⟨c₁..c_k, a₁..a_m⟩: every subset in
    /// canonical order whose antecedent count respects the cap has its node's
    /// counter incremented.
    ///
    /// The expansion is worklist-driven, never recursive: tries grow to
    /// 2^k · Σ C(m, j≤cap) paths per transaction and must not be bounded by
    /// stack depth.
    pub fn insert_canonical(&mut self, items: &[PreparedItem]) {
        let mut worklist: Vec<(NodeId, usize, usize)> = vec![(ROOT, 0, 0)];
        while let Some((node, start, antecedents)) = worklist.pop() {
            for (offset, item) in items[start..].iter().enumerate() {
                let count = antecedents + usize::from(!item.is_consequent());
                if let Some(cap) = self.max_antecedents_length {
                    if count > cap {
                        // Canonical order: every remaining item is also an
                        // antecedent, so the whole suffix is over the cap.
                        break;
                    }
                }
                let child = self.get_or_create_child(node, item);
                self.nodes[child].occurrences += 1;
                worklist.push((child, start + offset + 1, count));
            }
        }
        self.number_transactions += 1;
    }

    /// Undo [`Self::insert_canonical`] for one transaction: the same capped
    /// subset expansion is walked, every subset node is decremented, and
    /// nodes whose counter reaches zero are detached and freed.
    ///
    /// All subset nodes are resolved before anything is mutated, so a failed
    /// removal leaves the trie untouched.
    pub fn remove_canonical(&mut self, items: &[PreparedItem]) -> Result<()> {
        if self.number_transactions == 0 {
            return Err(Error::EmptyDatabase);
        }
        let mut visited: Vec<NodeId> = Vec::new();
        let mut worklist: Vec<(NodeId, usize, usize)> = vec![(ROOT, 0, 0)];
        while let Some((node, start, antecedents)) = worklist.pop() {
            for (offset, item) in items[start..].iter().enumerate() {
                let count = antecedents + usize::from(!item.is_consequent());
                if let Some(cap) = self.max_antecedents_length {
                    if count > cap {
                        break;
                    }
                }
                let Some(child) = self.nodes[node].children.get(item.key()).copied() else {
                    return Err(Error::TransactionNotFound {
                        transaction: self.display_items(items),
                    });
                };
                visited.push(child);
                worklist.push((child, start + offset + 1, count));
            }
        }
        for &id in &visited {
            // Attached nodes count at least one insertion; zero would make
            // the decrement below underflow.
            if self.nodes[id].occurrences == 0 {
                return Err(Error::TransactionNotFound {
                    transaction: self.display_items(items),
                });
            }
        }
        let mut zeroed: Vec<NodeId> = Vec::new();
        for &id in &visited {
            self.nodes[id].occurrences -= 1;
            if self.nodes[id].occurrences == 0 {
                zeroed.push(id);
            }
        }
        for &id in &zeroed {
            self.detach(id)?;
        }
        for &id in &zeroed {
            self.release(id);
        }
        self.number_transactions -= 1;
        debug!(
            removed_nodes = zeroed.len(),
            number_transactions = self.number_transactions,
            "transaction removed"
        );
        Ok(())
    }

    fn get_or_create_child(&mut self, parent: NodeId, item: &PreparedItem) -> NodeId {
        if let Some(&child) = self.nodes[parent].children.get(item.key()) {
            return child;
        }
        let node = Node::child(
            item.compressed().to_vec().into_boxed_slice(),
            item.is_consequent(),
            parent,
        );
        let id = self.allocate(node);
        self.nodes[parent].children.insert(item.key().clone(), id);
        id
    }

    /// Child creation from an existing edge key, used by merge and snapshot
    /// restore where no `PreparedItem` is at hand.
    pub(crate) fn get_or_create_child_from_key(
        &mut self,
        parent: NodeId,
        key: &ChildKey,
        is_consequent: bool,
    ) -> NodeId {
        if let Some(&child) = self.nodes[parent].children.get(key) {
            return child;
        }
        let node = Node::child(key.compressed.clone(), is_consequent, parent);
        let id = self.allocate(node);
        self.nodes[parent].children.insert(key.clone(), id);
        id
    }

    fn allocate(&mut self, node: Node) -> NodeId {
        self.number_nodes += 1;
        if let Some(id) = self.free.pop() {
            self.nodes[id] = node;
            id
        } else {
            self.nodes.push(node);
            self.nodes.len() - 1
        }
    }

    /// Remove a zero-count node from its parent's child map.
    fn detach(&mut self, id: NodeId) -> Result<()> {
        let Some(parent) = self.nodes[id].parent else {
            return Ok(());
        };
        let key = self.key_for_compressed(&self.nodes[id].compressed)?;
        self.nodes[parent].children.remove(&key);
        Ok(())
    }

    /// Return a detached node's slot to the free list.
    fn release(&mut self, id: NodeId) {
        self.nodes[id].children.clear();
        self.nodes[id].parent = None;
        self.free.push(id);
        self.number_nodes -= 1;
    }

    // ------------------------------------------------------------------
    // Lookup
    // ------------------------------------------------------------------

    /// Walk from the root along the given compressed items.
    ///
    /// `missing` selects what happens when a component has no child: fail
    /// with [`Error::UnknownItemset`], skip the component, or yield `None`.
    pub fn get_node_from_compressed(
        &self,
        path: &[Vec<u8>],
        missing: MissingItems,
    ) -> Result<Option<NodeId>> {
        if path.is_empty() {
            return Err(Error::EmptyItemset);
        }
        let mut node = ROOT;
        for compressed in path {
            let key = self.key_for_compressed(compressed)?;
            match self.nodes[node].children.get(&key) {
                Some(&child) => node = child,
                None => match missing {
                    MissingItems::Fail => {
                        return Err(Error::UnknownItemset {
                            itemset: self.display_compressed(path),
                        })
                    }
                    MissingItems::Skip => continue,
                    MissingItems::ReturnNone => return Ok(None),
                },
            }
        }
        Ok(Some(node))
    }

    /// Resolve a compressed path that is required to exist.
    pub(crate) fn require_node(&self, path: &[Vec<u8>]) -> Result<NodeId> {
        match self.get_node_from_compressed(path, MissingItems::Fail)? {
            Some(id) => Ok(id),
            None => Err(Error::UnknownItemset {
                itemset: self.display_compressed(path),
            }),
        }
    }

    pub(crate) fn key_for_compressed(&self, compressed: &[u8]) -> Result<ChildKey> {
        let normalized = self.codec.decompress(compressed)?;
        let rank = if self.is_consequent_item(&normalized) {
            ItemRank::Consequent
        } else {
            ItemRank::Antecedent
        };
        Ok(ChildKey {
            rank,
            folded: fold_case(&normalized).into_boxed_str(),
            compressed: compressed.to_vec().into_boxed_slice(),
        })
    }

    // ------------------------------------------------------------------
    // Paths and metrics
    // ------------------------------------------------------------------

    /// Compressed items along the path from the root to this node.
    pub fn path_compressed(&self, id: NodeId) -> Vec<Vec<u8>> {
        let mut path = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ROOT {
                break;
            }
            path.push(self.nodes[node].compressed.to_vec());
            current = self.nodes[node].parent;
        }
        path.reverse();
        path
    }

    /// Compressed path split into (consequents, antecedents), each in
    /// canonical order.
    pub fn path_split(&self, id: NodeId) -> (Vec<Vec<u8>>, Vec<Vec<u8>>) {
        let mut consequents = Vec::new();
        let mut antecedents = Vec::new();
        let mut current = Some(id);
        while let Some(node) = current {
            if node == ROOT {
                break;
            }
            let compressed = self.nodes[node].compressed.to_vec();
            if self.nodes[node].is_consequent {
                consequents.push(compressed);
            } else {
                antecedents.push(compressed);
            }
            current = self.nodes[node].parent;
        }
        consequents.reverse();
        antecedents.reverse();
        (consequents, antecedents)
    }

    /// Decompressed items along the path, in canonical order.
    pub fn itemset_decompressed(&self, id: NodeId) -> Result<Vec<String>> {
        self.path_compressed(id)
            .iter()
            .map(|compressed| self.codec.decompress(compressed))
            .collect()
    }

    /// Number of items in the itemset this node represents.
    pub fn itemset_length(&self, id: NodeId) -> usize {
        let mut length = 0;
        let mut current = id;
        while let Some(parent) = self.nodes[current].parent {
            length += 1;
            current = parent;
        }
        length
    }

    /// Relative support of this node's itemset.
    pub fn support(&self, id: NodeId) -> f64 {
        if self.number_transactions == 0 {
            return 0.0;
        }
        self.nodes[id].occurrences as f64 / self.number_transactions as f64
    }

    /// Confidence of the rule antecedents ⇒ consequents at this node; 1 when
    /// the path has no antecedents.
    pub fn confidence(&self, id: NodeId) -> Result<f64> {
        let (_, antecedents) = self.path_split(id);
        if antecedents.is_empty() {
            return Ok(1.0);
        }
        let antecedent_node = self.require_node(&antecedents)?;
        let denominator = self.support(antecedent_node);
        if denominator == 0.0 {
            return Ok(0.0);
        }
        Ok(self.support(id) / denominator)
    }

    /// Lift of the rule at this node; 1 unless the path has both a consequent
    /// and an antecedent part.
    pub fn lift(&self, id: NodeId) -> Result<f64> {
        let (consequents, antecedents) = self.path_split(id);
        if consequents.is_empty() || antecedents.is_empty() {
            return Ok(1.0);
        }
        let antecedent_node = self.require_node(&antecedents)?;
        let consequent_node = self.require_node(&consequents)?;
        let denominator = self.support(antecedent_node) * self.support(consequent_node);
        if denominator == 0.0 {
            return Ok(0.0);
        }
        Ok(self.support(id) / denominator)
    }

    // ------------------------------------------------------------------
    // Display helpers
    // ------------------------------------------------------------------

    pub(crate) fn display_compressed(&self, path: &[Vec<u8>]) -> String {
        path.iter()
            .map(|compressed| {
                self.codec
                    .decompress(compressed)
                    .unwrap_or_else(|_| String::from("?"))
            })
            .collect::<Vec<_>>()
            .join(&self.item_separator)
    }

    fn display_items(&self, items: &[PreparedItem]) -> String {
        items
            .iter()
            .map(|item| item.normalized().to_string())
            .collect::<Vec<_>>()
            .join(&self.item_separator)
    }
}
