//! The transaction database: the public mining surface.

use crate::common_sense::{CommonSenseRule, CommonSenseRuleSet};
use crate::filters::{ItemsetFilters, RuleFilters};
use crate::itemsets::{self, FrequentItemset};
use crate::predict::{self, Prediction};
use crate::preprocess::Preprocessor;
use crate::rules::{self, DerivedRule};
use arm_common::{Error, Result};
use arm_config::Settings;
use arm_trie::{ItemsetsTrie, MissingItems};
use rand::Rng;
use tracing::{debug, info};

/// Transaction database for mining association rules around a fixed set of
/// declared consequents.
#[derive(Debug, Clone)]
pub struct Database {
    preprocessor: Preprocessor,
    trie: ItemsetsTrie,
    common_sense_rules: CommonSenseRuleSet,
}

impl Database {
    /// Create an empty database with the given settings.
    pub fn new(settings: Settings) -> Result<Self> {
        let preprocessor = Preprocessor::new(settings)?;
        let trie = Self::empty_trie(&preprocessor);
        Ok(Database {
            preprocessor,
            trie,
            common_sense_rules: CommonSenseRuleSet::default(),
        })
    }

    fn empty_trie(preprocessor: &Preprocessor) -> ItemsetsTrie {
        let settings = preprocessor.settings();
        ItemsetsTrie::new(
            preprocessor.codec().clone(),
            preprocessor.normalized_consequents().clone(),
            settings.max_antecedents_length,
            settings.item_separator.clone(),
        )
    }

    pub(crate) fn from_parts(
        preprocessor: Preprocessor,
        trie: ItemsetsTrie,
        common_sense_rules: CommonSenseRuleSet,
    ) -> Self {
        Database {
            preprocessor,
            trie,
            common_sense_rules,
        }
    }

    pub fn settings(&self) -> &Settings {
        self.preprocessor.settings()
    }

    pub(crate) fn trie(&self) -> &ItemsetsTrie {
        &self.trie
    }

    /// Number of inserted transactions.
    pub fn number_transactions(&self) -> u64 {
        self.trie.number_transactions()
    }

    /// Number of trie nodes, including the root.
    pub fn number_nodes(&self) -> u64 {
        self.trie.number_nodes()
    }

    // ------------------------------------------------------------------
    // Transactions
    // ------------------------------------------------------------------

    /// Insert one transaction (an unordered collection of items).
    pub fn insert_transaction<I, S>(&mut self, transaction: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prepared = self.preprocessor.prepare_transaction(transaction)?;
        self.trie.insert_canonical(&prepared);
        Ok(())
    }

    /// Insert many transactions, randomly skipping each with probability
    /// `1 - sampling_ratio` to keep very large inputs tractable.
    pub fn insert_transactions<I, T, S>(&mut self, transactions: I, sampling_ratio: f64) -> Result<()>
    where
        I: IntoIterator<Item = T>,
        T: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        if !(0.0..=1.0).contains(&sampling_ratio) {
            return Err(Error::RangeError {
                parameter: "sampling_ratio",
                min: 0.0,
                max: 1.0,
                value: sampling_ratio,
            });
        }
        let mut rng = rand::rng();
        let mut inserted = 0u64;
        let mut skipped = 0u64;
        for transaction in transactions {
            if sampling_ratio == 1.0 || rng.random::<f64>() < sampling_ratio {
                self.insert_transaction(transaction)?;
                inserted += 1;
            } else {
                skipped += 1;
            }
        }
        info!(inserted, skipped, sampling_ratio, "bulk insert finished");
        Ok(())
    }

    /// Remove one previously inserted transaction, undoing its insertion
    /// exactly. With `silent`, removing an unknown transaction is a no-op.
    pub fn remove_transaction<I, S>(&mut self, transaction: I, silent: bool) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let prepared = self.preprocessor.prepare_transaction(transaction)?;
        match self.trie.remove_canonical(&prepared) {
            Err(Error::TransactionNotFound { .. }) if silent => Ok(()),
            other => other,
        }
    }

    // ------------------------------------------------------------------
    // Itemset queries
    // ------------------------------------------------------------------

    /// Whether the given itemset was materialised by any insertion.
    pub fn has_itemset<I, S>(&self, itemset: I) -> Result<bool>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.preprocessor.compress_canonical(itemset)?;
        Ok(self
            .trie
            .get_node_from_compressed(&path, MissingItems::ReturnNone)?
            .is_some())
    }

    /// Look up one itemset's row. `skip_unknown_items` skips path components
    /// with no node; `none_if_not_exists` yields `Ok(None)` instead of
    /// failing on a missing path.
    pub fn get_itemset<I, S>(
        &self,
        itemset: I,
        skip_unknown_items: bool,
        none_if_not_exists: bool,
    ) -> Result<Option<FrequentItemset>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let path = self.preprocessor.compress_canonical(itemset)?;
        let missing = if skip_unknown_items {
            MissingItems::Skip
        } else if none_if_not_exists {
            MissingItems::ReturnNone
        } else {
            MissingItems::Fail
        };
        let Some(node) = self.trie.get_node_from_compressed(&path, missing)? else {
            return Ok(None);
        };
        Ok(Some(FrequentItemset {
            itemset: self.trie.itemset_decompressed(node)?,
            occurrences: self.trie.occurrences(node),
            support: self.trie.support(node),
            itemset_length: self.trie.itemset_length(node),
        }))
    }

    // ------------------------------------------------------------------
    // Common-sense rules
    // ------------------------------------------------------------------

    /// Build a common-sense rule against this database's normalization and
    /// codec, without inserting it.
    pub fn common_sense_rule<I, S, J, T>(
        &self,
        antecedents: I,
        consequents: J,
        confidence: f64,
    ) -> Result<CommonSenseRule>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if !(0.0..=1.0).contains(&confidence) {
            return Err(Error::RangeError {
                parameter: "confidence",
                min: 0.0,
                max: 1.0,
                value: confidence,
            });
        }
        CommonSenseRule::new(&self.preprocessor, antecedents, consequents, confidence)
    }

    /// Insert one expert rule; the set is deduplicated and minimised.
    pub fn insert_common_sense_rule<I, S, J, T>(
        &mut self,
        antecedents: I,
        consequents: J,
        confidence: f64,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let rule = self.common_sense_rule(antecedents, consequents, confidence)?;
        self.common_sense_rules
            .insert_batch([rule], &self.preprocessor)
    }

    /// Insert a batch of expert rules at once.
    pub fn insert_common_sense_rules(
        &mut self,
        rules: impl IntoIterator<Item = CommonSenseRule>,
    ) -> Result<()> {
        self.common_sense_rules
            .insert_batch(rules, &self.preprocessor)
    }

    /// The minimised rule set in canonical order.
    pub fn get_common_sense_rules(&self) -> &[CommonSenseRule] {
        self.common_sense_rules.rules()
    }

    /// Remove one structurally equal rule; no-op when absent.
    pub fn remove_common_sense_rule<I, S, J, T>(
        &mut self,
        antecedents: I,
        consequents: J,
        confidence: f64,
    ) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let rule = self.common_sense_rule(antecedents, consequents, confidence)?;
        self.common_sense_rules.remove(&rule);
        Ok(())
    }

    /// Clear all common-sense rules.
    pub fn clear_common_sense_rules(&mut self) {
        self.common_sense_rules.clear();
    }

    // ------------------------------------------------------------------
    // Mining
    // ------------------------------------------------------------------

    /// Derive the frequent itemsets that pass the filters.
    pub fn derive_frequent_itemsets(
        &self,
        filters: &ItemsetFilters,
        omit_column_names: bool,
    ) -> Result<Vec<FrequentItemset>> {
        itemsets::derive_frequent_itemsets(
            &self.trie,
            &self.preprocessor,
            filters,
            omit_column_names || self.settings().omit_column_names,
        )
    }

    /// Derive antecedents ⇒ consequents rules, eliminating redundancies
    /// against previously emitted and common-sense rules.
    pub fn derive_rules(
        &self,
        filters: &RuleFilters,
        non_antecedents_rules: bool,
        omit_column_names: bool,
    ) -> Result<Vec<DerivedRule>> {
        rules::derive_rules(
            &self.trie,
            &self.preprocessor,
            &self.common_sense_rules,
            filters,
            non_antecedents_rules,
            omit_column_names || self.settings().omit_column_names,
        )
    }

    /// Predict the probability of each target consequent given antecedents.
    pub fn predict_consequents<S: AsRef<str>>(
        &self,
        antecedents: &[S],
        consequents: Option<&[S]>,
        skip_unknown_antecedents: bool,
    ) -> Result<Vec<Prediction>> {
        if self.preprocessor.normalized_consequents().is_empty() && consequents.is_none() {
            return Ok(Vec::new());
        }
        predict::predict_consequents(
            &self.trie,
            &self.preprocessor,
            &self.common_sense_rules,
            antecedents,
            consequents,
            skip_unknown_antecedents,
        )
    }

    /// Render the trie as a human-readable metrics table.
    pub fn render_trie(&self) -> Result<String> {
        self.trie.render()
    }

    // ------------------------------------------------------------------
    // Merging
    // ------------------------------------------------------------------

    /// Fold another database into this one. Both must use equal settings.
    pub fn merge_with(&mut self, other: &Database) -> Result<()> {
        if self.settings() != other.settings() {
            return Err(Error::SettingsMismatch);
        }
        self.trie.merge_from(&other.trie);
        self.common_sense_rules
            .insert_batch(other.common_sense_rules.iter().cloned(), &self.preprocessor)?;
        debug!(
            number_transactions = self.number_transactions(),
            number_nodes = self.number_nodes(),
            "databases merged"
        );
        Ok(())
    }

    /// Merge any number of databases, accumulating into the one with the
    /// most nodes to minimise work.
    pub fn merge_many(mut databases: Vec<Database>) -> Result<Database> {
        if databases.is_empty() {
            return Err(Error::EmptyDatabase);
        }
        let largest = databases
            .iter()
            .enumerate()
            .max_by_key(|(_, database)| database.number_nodes())
            .map(|(index, _)| index)
            .unwrap_or(0);
        let mut result = databases.swap_remove(largest);
        for database in &databases {
            result.merge_with(database)?;
        }
        Ok(result)
    }

    pub(crate) fn common_sense_rule_set(&self) -> &CommonSenseRuleSet {
        &self.common_sense_rules
    }
}
