//! Frequent-itemset enumeration.

use crate::filters::ItemsetFilters;
use crate::preprocess::Preprocessor;
use arm_common::Result;
use arm_trie::{ItemsetsTrie, VisitorControl};
use serde::Serialize;

/// One row of the frequent-itemset table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FrequentItemset {
    /// Decompressed items in canonical order.
    pub itemset: Vec<String>,
    pub occurrences: u64,
    pub support: f64,
    pub itemset_length: usize,
}

/// Depth-first walk collecting every node that passes the filters.
pub(crate) fn derive_frequent_itemsets(
    trie: &ItemsetsTrie,
    preprocessor: &Preprocessor,
    filters: &ItemsetFilters,
    omit_column_names: bool,
) -> Result<Vec<FrequentItemset>> {
    let mut result = Vec::new();
    let mut error = None;
    trie.visit_depth_first(filters.consequent_itemsets_only, |id, _| {
        let length = trie.itemset_length(id);
        let occurrences = trie.occurrences(id);
        let support = trie.support(id);
        if filters.matches(length, occurrences, support) {
            match trie.itemset_decompressed(id) {
                Ok(mut itemset) => {
                    if omit_column_names {
                        itemset = preprocessor.strip_column_names(&itemset);
                    }
                    result.push(FrequentItemset {
                        itemset,
                        occurrences,
                        support,
                        itemset_length: length,
                    });
                }
                Err(err) => {
                    error = Some(err);
                    return VisitorControl::Stop;
                }
            }
        }
        VisitorControl::Continue
    });
    match error {
        Some(err) => Err(err),
        None => Ok(result),
    }
}
