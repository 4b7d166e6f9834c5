//! Merging one trie into another.

use crate::node::{NodeId, ROOT};
use crate::trie::ItemsetsTrie;
use tracing::debug;

impl ItemsetsTrie {
    /// Fold every node of `other` into `self`, summing occurrence counters
    /// and creating missing nodes through the regular child-creation routine.
    ///
    /// The caller is responsible for ensuring both tries were built under
    /// equal settings; item roles and sibling order are only compatible then.
    pub fn merge_from(&mut self, other: &ItemsetsTrie) {
        let nodes_before = self.number_nodes;
        let mut stack: Vec<(NodeId, NodeId)> = vec![(ROOT, ROOT)];
        while let Some((src, dst)) = stack.pop() {
            for (key, &src_child) in &other.nodes[src].children {
                let dst_child =
                    self.get_or_create_child_from_key(dst, key, other.nodes[src_child].is_consequent);
                self.nodes[dst_child].occurrences += other.nodes[src_child].occurrences;
                stack.push((src_child, dst_child));
            }
        }
        self.number_transactions += other.number_transactions;
        debug!(
            created_nodes = self.number_nodes - nodes_before,
            number_transactions = self.number_transactions,
            "trie merged"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PreparedItem;
    use crate::trie::MissingItems;
    use arm_codec::ItemCodec;
    use std::collections::BTreeSet;

    fn new_trie() -> ItemsetsTrie {
        let consequents: BTreeSet<String> =
            ["bread", "milk"].iter().map(|s| s.to_string()).collect();
        ItemsetsTrie::new(ItemCodec::new(None), consequents, None, " \u{222a} ")
    }

    fn insert(trie: &mut ItemsetsTrie, transaction: &[&str]) {
        let mut consequents: Vec<&str> = transaction
            .iter()
            .copied()
            .filter(|item| trie.is_consequent_item(item))
            .collect();
        let mut antecedents: Vec<&str> = transaction
            .iter()
            .copied()
            .filter(|item| !trie.is_consequent_item(item))
            .collect();
        consequents.sort_unstable();
        antecedents.sort_unstable();
        let items: Vec<PreparedItem> = consequents
            .into_iter()
            .chain(antecedents)
            .map(|item| {
                PreparedItem::new(
                    item,
                    trie.codec.compress(item).unwrap(),
                    trie.is_consequent_item(item),
                )
            })
            .collect();
        trie.insert_canonical(&items);
    }

    fn occurrences(trie: &ItemsetsTrie, items: &[&str]) -> Option<u64> {
        let mut sorted: Vec<&str> = items.to_vec();
        sorted.sort_unstable_by_key(|item| (!trie.is_consequent_item(item), item.to_lowercase()));
        let path: Vec<Vec<u8>> = sorted
            .iter()
            .map(|item| trie.codec.compress(item).unwrap())
            .collect();
        trie.get_node_from_compressed(&path, MissingItems::ReturnNone)
            .unwrap()
            .map(|id| trie.occurrences(id))
    }

    #[test]
    fn merged_counts_equal_union_of_inputs() {
        let mut left = new_trie();
        insert(&mut left, &["milk", "bread"]);
        insert(&mut left, &["butter"]);

        let mut right = new_trie();
        insert(&mut right, &["beer", "diapers"]);
        insert(&mut right, &["milk", "bread", "butter"]);
        insert(&mut right, &["bread"]);

        let mut union = new_trie();
        for transaction in [
            vec!["milk", "bread"],
            vec!["butter"],
            vec!["beer", "diapers"],
            vec!["milk", "bread", "butter"],
            vec!["bread"],
        ] {
            insert(&mut union, &transaction);
        }

        left.merge_from(&right);
        assert_eq!(left.number_transactions(), union.number_transactions());
        assert_eq!(left.number_nodes(), union.number_nodes());
        for itemset in [
            vec!["bread"],
            vec!["milk"],
            vec!["butter"],
            vec!["bread", "milk"],
            vec!["bread", "butter"],
            vec!["bread", "milk", "butter"],
            vec!["beer", "diapers"],
        ] {
            assert_eq!(
                occurrences(&left, &itemset),
                occurrences(&union, &itemset),
                "{itemset:?}"
            );
        }
    }

    #[test]
    fn merge_into_empty_copies_everything() {
        let mut src = new_trie();
        insert(&mut src, &["milk", "bread"]);
        let mut dst = new_trie();
        dst.merge_from(&src);
        assert_eq!(dst.number_nodes(), src.number_nodes());
        assert_eq!(occurrences(&dst, &["bread", "milk"]), Some(1));
    }
}
