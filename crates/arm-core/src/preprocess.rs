//! Pre- and post-processing of item data.
//!
//! The preprocessor owns the codec and the normalized consequent set and is
//! the single place where raw items become canonical, compressed trie input
//! and where compressed output becomes text again.

use arm_codec::{fold_case, normalize_item, ItemCodec};
use arm_common::Result;
use arm_config::Settings;
use arm_trie::PreparedItem;
use std::collections::BTreeSet;

#[derive(Debug, Clone)]
pub struct Preprocessor {
    settings: Settings,
    codec: ItemCodec,
    normalized_consequents: BTreeSet<String>,
}

impl Preprocessor {
    /// Build a preprocessor for the given settings.
    ///
    /// Fails early when a declared consequent contains characters outside the
    /// configured alphabet.
    pub fn new(settings: Settings) -> Result<Self> {
        let codec = ItemCodec::new(settings.effective_item_alphabet().as_deref());
        let normalized_consequents: BTreeSet<String> = settings
            .consequents
            .iter()
            .map(|consequent| {
                normalize_item(
                    consequent,
                    settings.normalize_whitespace,
                    settings.case_insensitive,
                )
            })
            .collect();
        for consequent in &normalized_consequents {
            codec.compress(consequent)?;
        }
        Ok(Preprocessor {
            settings,
            codec,
            normalized_consequents,
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn codec(&self) -> &ItemCodec {
        &self.codec
    }

    pub fn normalized_consequents(&self) -> &BTreeSet<String> {
        &self.normalized_consequents
    }

    /// Whether a normalized item is a declared consequent.
    pub fn is_consequent(&self, normalized: &str) -> bool {
        self.normalized_consequents.contains(normalized)
    }

    /// Normalize one raw item.
    pub fn normalize(&self, item: &str) -> String {
        normalize_item(
            item,
            self.settings.normalize_whitespace,
            self.settings.case_insensitive,
        )
    }

    /// Normalize an itemset: normalize each item and deduplicate.
    pub fn normalize_itemset<I, S>(&self, items: I) -> BTreeSet<String>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        items
            .into_iter()
            .map(|item| self.normalize(item.as_ref()))
            .collect()
    }

    /// Split a normalized itemset into (consequents, antecedents), each
    /// sorted by case-folded form.
    pub fn partition(&self, items: &BTreeSet<String>) -> (Vec<String>, Vec<String>) {
        let (mut consequents, mut antecedents): (Vec<String>, Vec<String>) = items
            .iter()
            .cloned()
            .partition(|item| self.is_consequent(item));
        consequents.sort_by_key(|item| (fold_case(item), item.clone()));
        antecedents.sort_by_key(|item| (fold_case(item), item.clone()));
        (consequents, antecedents)
    }

    /// Normalize, canonicalise, and compress a raw transaction into trie
    /// input.
    pub fn prepare_transaction<I, S>(&self, items: I) -> Result<Vec<PreparedItem>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let normalized = self.normalize_itemset(items);
        let (consequents, antecedents) = self.partition(&normalized);
        consequents
            .into_iter()
            .map(|item| (item, true))
            .chain(antecedents.into_iter().map(|item| (item, false)))
            .map(|(item, is_consequent)| {
                let compressed = self.codec.compress(&item)?;
                Ok(PreparedItem::new(item, compressed, is_consequent))
            })
            .collect()
    }

    /// Normalize and compress an itemset into a canonical compressed path
    /// for trie lookups.
    pub fn compress_canonical<I, S>(&self, items: I) -> Result<Vec<Vec<u8>>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Ok(self
            .prepare_transaction(items)?
            .iter()
            .map(|item| item.compressed().to_vec())
            .collect())
    }

    /// Compress one normalized item.
    pub fn compress_item(&self, normalized: &str) -> Result<Vec<u8>> {
        self.codec.compress(normalized)
    }

    /// Strip `column<sep>` prefixes from the given items.
    pub fn strip_column_names(&self, items: &[String]) -> Vec<String> {
        let separator = &self.settings.column_value_separator;
        items
            .iter()
            .map(|item| match item.find(separator.as_str()) {
                Some(index) => item[index + separator.len()..].to_string(),
                None => item.clone(),
            })
            .collect()
    }

    /// Join an itemset for display using the configured separator.
    pub fn itemset_to_string(&self, items: &[String]) -> String {
        items.join(&self.settings.item_separator)
    }
}
