//! Trie traversal primitives.

use crate::node::{NodeId, ROOT};
use crate::trie::ItemsetsTrie;
use std::collections::VecDeque;

/// Control value returned by traversal visitors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VisitorControl {
    /// Keep walking.
    Continue,
    /// Do not descend into this node's children; continue with siblings.
    /// Breadth-first walks treat this as [`VisitorControl::Continue`].
    SkipChildren,
    /// Terminate the walk entirely.
    Stop,
}

impl ItemsetsTrie {
    /// First-level children eligible for a walk: all of them, or only the
    /// consequent block when `only_with_consequents` is set. The canonical
    /// sibling order sorts consequents first, so the block is a prefix.
    fn entry_nodes(&self, only_with_consequents: bool) -> Vec<NodeId> {
        let children = self.children_in_order(ROOT);
        if only_with_consequents {
            children
                .into_iter()
                .take_while(|&child| self.is_consequent(child))
                .collect()
        } else {
            children
        }
    }

    /// Depth-first pre-order walk over every non-root node.
    ///
    /// The visitor receives the node and its depth (1 for root children) and
    /// steers the walk through its return value.
    pub fn visit_depth_first<F>(&self, only_with_consequents: bool, mut visitor: F)
    where
        F: FnMut(NodeId, usize) -> VisitorControl,
    {
        let mut stack: Vec<(NodeId, usize)> = self
            .entry_nodes(only_with_consequents)
            .into_iter()
            .rev()
            .map(|id| (id, 1))
            .collect();
        while let Some((id, depth)) = stack.pop() {
            match visitor(id, depth) {
                VisitorControl::Stop => return,
                VisitorControl::SkipChildren => continue,
                VisitorControl::Continue => {
                    for child in self.children_in_order(id).into_iter().rev() {
                        stack.push((child, depth + 1));
                    }
                }
            }
        }
    }

    /// Breadth-first walk over every non-root node, level by level.
    pub fn visit_breadth_first<F>(&self, only_with_consequents: bool, mut visitor: F)
    where
        F: FnMut(NodeId, usize) -> VisitorControl,
    {
        let mut queue: VecDeque<(NodeId, usize)> = self
            .entry_nodes(only_with_consequents)
            .into_iter()
            .map(|id| (id, 1))
            .collect();
        while let Some((id, depth)) = queue.pop_front() {
            match visitor(id, depth) {
                VisitorControl::Stop => return,
                VisitorControl::Continue | VisitorControl::SkipChildren => {
                    for child in self.children_in_order(id) {
                        queue.push_back((child, depth + 1));
                    }
                }
            }
        }
    }

    /// All consequent children of the root.
    pub fn consequent_root_nodes(&self) -> Vec<NodeId> {
        self.entry_nodes(true)
    }

    /// The first-antecedent-after-consequents frontier: every node reachable
    /// from the root through consequent steps only, followed by exactly one
    /// antecedent step. This set seeds rule derivation.
    pub fn first_antecedent_frontier(&self) -> Vec<NodeId> {
        let mut frontier = Vec::new();
        let mut queue: VecDeque<NodeId> = self.consequent_root_nodes().into();
        while let Some(id) = queue.pop_front() {
            if self.is_consequent(id) {
                queue.extend(self.children_in_order(id));
            } else {
                frontier.push(id);
            }
        }
        frontier
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PreparedItem;
    use arm_codec::ItemCodec;

    fn sample_trie() -> ItemsetsTrie {
        let mut trie = ItemsetsTrie::new(
            ItemCodec::new(None),
            ["bread", "milk"].iter().map(|s| s.to_string()).collect(),
            None,
            " \u{222a} ",
        );
        for transaction in [
            vec!["bread", "milk", "butter"],
            vec!["bread", "beer"],
            vec!["candy"],
        ] {
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
        trie
    }

    fn label(trie: &ItemsetsTrie, id: NodeId) -> String {
        trie.itemset_decompressed(id).unwrap().join("+")
    }

    #[test]
    fn depth_first_is_preorder_in_canonical_order() {
        let trie = sample_trie();
        let mut seen = Vec::new();
        trie.visit_depth_first(false, |id, _| {
            seen.push(label(&trie, id));
            VisitorControl::Continue
        });
        // Consequent block first (bread before milk), then antecedents.
        assert_eq!(seen[0], "bread");
        assert!(seen.contains(&"bread+milk+butter".to_string()));
        let candy = seen.iter().position(|l| l == "candy").unwrap();
        let bread = seen.iter().position(|l| l == "bread").unwrap();
        assert!(bread < candy);
    }

    #[test]
    fn skip_children_prunes_a_subtree() {
        let trie = sample_trie();
        let mut seen = Vec::new();
        trie.visit_depth_first(false, |id, _| {
            let label = label(&trie, id);
            let control = if label == "bread" {
                VisitorControl::SkipChildren
            } else {
                VisitorControl::Continue
            };
            seen.push(label);
            control
        });
        assert!(seen.contains(&"bread".to_string()));
        assert!(!seen.contains(&"bread+milk".to_string()));
        assert!(seen.contains(&"milk".to_string()));
    }

    #[test]
    fn stop_terminates_the_walk() {
        let trie = sample_trie();
        let mut count = 0;
        trie.visit_depth_first(false, |_, _| {
            count += 1;
            if count == 3 {
                VisitorControl::Stop
            } else {
                VisitorControl::Continue
            }
        });
        assert_eq!(count, 3);
    }

    #[test]
    fn only_with_consequents_stops_at_the_antecedent_block() {
        let trie = sample_trie();
        let mut seen = Vec::new();
        trie.visit_depth_first(true, |id, _| {
            seen.push(label(&trie, id));
            VisitorControl::Continue
        });
        assert!(seen.iter().all(|l| !l.starts_with("beer")));
        assert!(!seen.contains(&"candy".to_string()));
        assert!(seen.contains(&"bread+milk".to_string()));
    }

    #[test]
    fn breadth_first_visits_levels_in_order() {
        let trie = sample_trie();
        let mut depths = Vec::new();
        trie.visit_breadth_first(false, |_, depth| {
            depths.push(depth);
            VisitorControl::Continue
        });
        assert!(depths.windows(2).all(|pair| pair[0] <= pair[1]));
    }

    #[test]
    fn frontier_contains_first_antecedents_only() {
        let trie = sample_trie();
        let labels: Vec<String> = trie
            .first_antecedent_frontier()
            .into_iter()
            .map(|id| label(&trie, id))
            .collect();
        // One antecedent step after a consequent chain, nothing deeper.
        assert!(labels.contains(&"bread+beer".to_string()));
        assert!(labels.contains(&"bread+butter".to_string()));
        assert!(labels.contains(&"bread+milk+butter".to_string()));
        assert!(labels.contains(&"milk+butter".to_string()));
        assert!(!labels.contains(&"candy".to_string()));
        assert!(!labels.contains(&"bread".to_string()));
        assert!(!labels.contains(&"bread+milk".to_string()));
    }
}
