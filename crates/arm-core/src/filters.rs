//! Numeric filters applied during itemset enumeration and rule derivation.

/// Filters for [`crate::Database::derive_frequent_itemsets`].
#[derive(Debug, Clone)]
pub struct ItemsetFilters {
    pub min_itemset_length: usize,
    pub max_itemset_length: Option<usize>,
    pub min_occurrences: u64,
    pub max_occurrences: Option<u64>,
    pub min_support: f64,
    pub max_support: f64,
    /// Only emit itemsets that contain at least one consequent.
    pub consequent_itemsets_only: bool,
}

impl Default for ItemsetFilters {
    fn default() -> Self {
        ItemsetFilters {
            min_itemset_length: 0,
            max_itemset_length: None,
            min_occurrences: 0,
            max_occurrences: None,
            min_support: 0.0,
            max_support: 1.0,
            consequent_itemsets_only: false,
        }
    }
}

impl ItemsetFilters {
    pub(crate) fn matches(&self, length: usize, occurrences: u64, support: f64) -> bool {
        length >= self.min_itemset_length
            && self.max_itemset_length.is_none_or(|max| length <= max)
            && occurrences >= self.min_occurrences
            && self.max_occurrences.is_none_or(|max| occurrences <= max)
            && support >= self.min_support
            && support <= self.max_support
    }
}

/// Filters for [`crate::Database::derive_rules`].
#[derive(Debug, Clone)]
pub struct RuleFilters {
    pub min_confidence: f64,
    pub max_confidence: f64,
    pub min_lift: f64,
    pub max_lift: Option<f64>,
    pub min_support: f64,
    pub max_support: f64,
    pub min_occurrences: u64,
    pub max_occurrences: Option<u64>,
    /// Cap on the antecedent count of emitted rules, independent of the
    /// trie-level cap.
    pub max_antecedents_length: Option<usize>,
    /// Widens the redundancy test: a candidate within this distance of a
    /// covering rule's confidence is considered redundant.
    pub confidence_tolerance: f64,
}

impl Default for RuleFilters {
    fn default() -> Self {
        RuleFilters {
            min_confidence: 0.0,
            max_confidence: 1.0,
            min_lift: 0.0,
            max_lift: None,
            min_support: 0.0,
            max_support: 1.0,
            min_occurrences: 0,
            max_occurrences: None,
            max_antecedents_length: None,
            confidence_tolerance: 0.0,
        }
    }
}

impl RuleFilters {
    pub(crate) fn matches(
        &self,
        confidence: f64,
        support: f64,
        lift: f64,
        occurrences: u64,
    ) -> bool {
        confidence >= self.min_confidence
            && confidence <= self.max_confidence
            && support >= self.min_support
            && support <= self.max_support
            && lift >= self.min_lift
            && self.max_lift.is_none_or(|max| lift <= max)
            && occurrences >= self.min_occurrences
            && self.max_occurrences.is_none_or(|max| occurrences <= max)
    }
}
