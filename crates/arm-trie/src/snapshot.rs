//! Flat snapshot form of a trie.
//!
//! The arena layout (free list, map keys) is an implementation detail; the
//! persisted form is a parent-indexed node list in canonical pre-order,
//! rebuilt through the regular child-creation routine on load.

use crate::node::{NodeId, PreparedItem, ROOT};
use crate::trie::ItemsetsTrie;
use crate::walk::VisitorControl;
use arm_codec::ItemCodec;
use arm_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// One node of the persisted trie. `parent` indexes into the snapshot node
/// list; `None` marks a child of the root.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub parent: Option<usize>,
    pub compressed: Vec<u8>,
    pub is_consequent: bool,
    pub occurrences: u64,
}

/// The persisted trie: node list plus the transaction counter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrieSnapshot {
    pub number_transactions: u64,
    pub nodes: Vec<NodeSnapshot>,
}

impl ItemsetsTrie {
    /// Flatten the trie into its snapshot form.
    pub fn to_snapshot(&self) -> TrieSnapshot {
        let mut nodes = Vec::with_capacity(self.number_nodes as usize - 1);
        let mut index_of = vec![usize::MAX; self.nodes.len()];
        self.visit_depth_first(false, |id, _| {
            let parent = self.parent(id).filter(|&p| p != ROOT).map(|p| index_of[p]);
            index_of[id] = nodes.len();
            nodes.push(NodeSnapshot {
                parent,
                compressed: self.nodes[id].compressed.to_vec(),
                is_consequent: self.is_consequent(id),
                occurrences: self.occurrences(id),
            });
            VisitorControl::Continue
        });
        TrieSnapshot {
            number_transactions: self.number_transactions,
            nodes,
        }
    }

    /// Rebuild a trie from its snapshot form.
    pub fn from_snapshot(
        snapshot: &TrieSnapshot,
        codec: ItemCodec,
        consequents: BTreeSet<String>,
        max_antecedents_length: Option<usize>,
        item_separator: impl Into<String>,
    ) -> Result<Self> {
        let mut trie = ItemsetsTrie::new(codec, consequents, max_antecedents_length, item_separator);
        let mut ids: Vec<NodeId> = Vec::with_capacity(snapshot.nodes.len());
        for node in &snapshot.nodes {
            let parent = match node.parent {
                Some(index) => ids[index],
                None => ROOT,
            };
            let normalized = trie.codec.decompress(&node.compressed)?;
            let item = PreparedItem::new(normalized, node.compressed.clone(), node.is_consequent);
            let id = trie.get_or_create_child_from_key(parent, item.key(), node.is_consequent);
            trie.nodes[id].occurrences = node.occurrences;
            ids.push(id);
        }
        trie.number_transactions = snapshot.number_transactions;
        Ok(trie)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::trie::MissingItems;

    fn sample_trie() -> ItemsetsTrie {
        let consequents: BTreeSet<String> = ["bread"].iter().map(|s| s.to_string()).collect();
        let mut trie = ItemsetsTrie::new(ItemCodec::new(None), consequents, Some(2), " \u{222a} ");
        for transaction in [
            vec!["bread", "milk"],
            vec!["butter"],
            vec!["bread", "milk", "butter"],
        ] {
            let mut items: Vec<&str> = transaction.clone();
            items.sort_unstable_by_key(|item| (!trie.is_consequent_item(item), item.to_lowercase()));
            let prepared: Vec<PreparedItem> = items
                .iter()
                .map(|item| {
                    PreparedItem::new(
                        *item,
                        trie.codec.compress(item).unwrap(),
                        trie.is_consequent_item(item),
                    )
                })
                .collect();
            trie.insert_canonical(&prepared);
        }
        trie
    }

    #[test]
    fn snapshot_roundtrip_preserves_structure_and_counts() {
        let trie = sample_trie();
        let snapshot = trie.to_snapshot();
        let rebuilt = ItemsetsTrie::from_snapshot(
            &snapshot,
            ItemCodec::new(None),
            ["bread"].iter().map(|s| s.to_string()).collect(),
            Some(2),
            " \u{222a} ",
        )
        .unwrap();
        assert_eq!(rebuilt.number_transactions(), trie.number_transactions());
        assert_eq!(rebuilt.number_nodes(), trie.number_nodes());
        for itemset in [vec!["bread"], vec!["bread", "milk"], vec!["butter"]] {
            let path: Vec<Vec<u8>> = itemset
                .iter()
                .map(|item| trie.codec.compress(item).unwrap())
                .collect();
            let original = trie
                .get_node_from_compressed(&path, MissingItems::Fail)
                .unwrap()
                .map(|id| trie.occurrences(id));
            let restored = rebuilt
                .get_node_from_compressed(&path, MissingItems::Fail)
                .unwrap()
                .map(|id| rebuilt.occurrences(id));
            assert_eq!(original, restored, "{itemset:?}");
        }
    }

    #[test]
    fn snapshot_is_serializable() {
        let trie = sample_trie();
        let json = serde_json::to_string(&trie.to_snapshot()).unwrap();
        let decoded: TrieSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.nodes.len(), trie.number_nodes() as usize - 1);
    }
}
