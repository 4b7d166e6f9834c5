//! Immutable database configuration.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Default item alphabet: ASCII digits, letters, punctuation, and whitespace.
pub const PRINTABLE_ALPHABET: &str = "0123456789abcdefghijklmnopqrstuvwxyz\
ABCDEFGHIJKLMNOPQRSTUVWXYZ!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~ \t\n\r\x0b\x0c";

/// Configuration shared by a database and all structures derived from it.
///
/// Settings are fixed at database creation. Two databases may only be merged
/// when their settings compare equal; equality is structural over every field,
/// with the item alphabet compared in its effective (case-folded) form.
/// Settings are intentionally not hashable.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Declared consequents of interest, sorted and deduplicated (raw form).
    pub consequents: Vec<String>,

    /// Collapse whitespace runs and strip items during normalization.
    pub normalize_whitespace: bool,

    /// Fold item case during normalization; item identity is case-insensitive.
    pub case_insensitive: bool,

    /// Upper bound on the antecedent count of materialised itemsets.
    /// `None` means unlimited.
    pub max_antecedents_length: Option<usize>,

    /// Separator placed between items when itemsets are rendered as strings.
    pub item_separator: String,

    /// Separator between a column name and its value within one item.
    pub column_value_separator: String,

    /// Strip `column=` prefixes from items in derived outputs.
    pub omit_column_names: bool,

    /// Characters allowed in items; `None` disables compression entirely.
    pub item_alphabet: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self::new(Vec::<String>::new())
    }
}

impl Settings {
    /// Create settings with the given declared consequents and defaults for
    /// everything else.
    pub fn new<I, S>(consequents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let consequents: BTreeSet<String> = consequents.into_iter().map(Into::into).collect();
        Settings {
            consequents: consequents.into_iter().collect(),
            normalize_whitespace: true,
            case_insensitive: true,
            max_antecedents_length: None,
            item_separator: " \u{222a} ".to_string(),
            column_value_separator: "=".to_string(),
            omit_column_names: false,
            item_alphabet: Some(PRINTABLE_ALPHABET.to_string()),
        }
    }

    /// Set whitespace normalization.
    pub fn with_normalize_whitespace(mut self, normalize_whitespace: bool) -> Self {
        self.normalize_whitespace = normalize_whitespace;
        self
    }

    /// Set case-insensitive item identity.
    pub fn with_case_insensitive(mut self, case_insensitive: bool) -> Self {
        self.case_insensitive = case_insensitive;
        self
    }

    /// Cap the antecedent length of materialised itemsets.
    pub fn with_max_antecedents_length(mut self, max: Option<usize>) -> Self {
        self.max_antecedents_length = max;
        self
    }

    /// Set the separator used when itemsets are rendered as strings.
    pub fn with_item_separator(mut self, separator: impl Into<String>) -> Self {
        self.item_separator = separator.into();
        self
    }

    /// Set the separator between column names and values within items.
    pub fn with_column_value_separator(mut self, separator: impl Into<String>) -> Self {
        self.column_value_separator = separator.into();
        self
    }

    /// Strip `column=` prefixes from items in derived outputs by default.
    pub fn with_omit_column_names(mut self, omit: bool) -> Self {
        self.omit_column_names = omit;
        self
    }

    /// Restrict items to the given alphabet, or lift the restriction with
    /// `None` (which also disables compression).
    pub fn with_item_alphabet(mut self, alphabet: Option<impl Into<String>>) -> Self {
        self.item_alphabet = alphabet.map(Into::into);
        self
    }

    /// The alphabet as seen by the codec: when item identity is
    /// case-insensitive, collapsed to sorted case-folded distinct characters.
    pub fn effective_item_alphabet(&self) -> Option<String> {
        let alphabet = self.item_alphabet.as_ref()?;
        if !self.case_insensitive {
            return Some(alphabet.clone());
        }
        let folded: BTreeSet<char> = alphabet.chars().flat_map(|ch| ch.to_lowercase()).collect();
        Some(folded.into_iter().collect())
    }
}

impl PartialEq for Settings {
    fn eq(&self, other: &Self) -> bool {
        self.consequents == other.consequents
            && self.normalize_whitespace == other.normalize_whitespace
            && self.case_insensitive == other.case_insensitive
            && self.max_antecedents_length == other.max_antecedents_length
            && self.item_separator == other.item_separator
            && self.column_value_separator == other.column_value_separator
            && self.omit_column_names == other.omit_column_names
            && self.effective_item_alphabet() == other.effective_item_alphabet()
    }
}
