//! Human-readable rendering of a trie.

use crate::trie::ItemsetsTrie;
use crate::walk::VisitorControl;
use arm_common::Result;
use std::fmt::Write;

impl ItemsetsTrie {
    /// Render the trie as a metrics table, one row per node in canonical
    /// depth-first order, with a totals footer. Consequent-only paths are
    /// parenthesised.
    pub fn render(&self) -> Result<String> {
        let mut out = String::new();
        let _ = writeln!(
            out,
            "Occurrences | Support | Confidence | Lift   | Path"
        );
        let _ = writeln!(out, "{}", "-".repeat(80));
        let mut error = None;
        self.visit_depth_first(false, |id, depth| {
            match self.render_row(id, depth) {
                Ok(row) => {
                    let _ = writeln!(out, "{row}");
                    VisitorControl::Continue
                }
                Err(err) => {
                    error = Some(err);
                    VisitorControl::Stop
                }
            }
        });
        if let Some(err) = error {
            return Err(err);
        }
        let _ = writeln!(out);
        let _ = writeln!(
            out,
            "Total number of transactions: {}",
            self.number_transactions
        );
        let _ = write!(
            out,
            "Total number of nodes (incl. root node): {}",
            self.number_nodes
        );
        Ok(out)
    }

    fn render_row(&self, id: usize, depth: usize) -> Result<String> {
        let items = self.itemset_decompressed(id)?;
        let mut path = items.join(&self.item_separator);
        if self.is_consequent(id) {
            // Canonical order puts consequents first, so the last item being
            // a consequent means the whole path is consequents.
            path = format!("({path})");
        }
        let indent = if depth > 1 {
            format!("{}\u{2514} ", "  ".repeat(depth))
        } else {
            String::new()
        };
        Ok(format!(
            "{:>11} | {:>7.2} | {:>10.2} | {:>6.2} | {}{}",
            self.occurrences(id),
            self.support(id),
            self.confidence(id)?,
            self.lift(id)?,
            indent,
            path
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::PreparedItem;
    use arm_codec::ItemCodec;
    use std::collections::BTreeSet;

    #[test]
    fn render_lists_every_node_with_totals() {
        let consequents: BTreeSet<String> =
            ["bread", "milk"].iter().map(|s| s.to_string()).collect();
        let mut trie = ItemsetsTrie::new(ItemCodec::new(None), consequents, None, " \u{222a} ");
        for transaction in [vec!["milk", "bread"], vec!["butter"]] {
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
        let rendered = trie.render().unwrap();
        assert!(rendered.contains("(bread)"));
        assert!(rendered.contains("(bread \u{222a} milk)"));
        assert!(rendered.contains("butter"));
        assert!(rendered.contains("Total number of transactions: 2"));
        assert!(rendered.contains("Total number of nodes (incl. root node): 5"));
    }
}
