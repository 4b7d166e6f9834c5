//! Common-sense rules: expert knowledge used to suppress redundant mined
//! rules and to short-circuit predictions.

use crate::preprocess::Preprocessor;
use arm_common::Result;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

/// One expert rule: antecedents ⇒ consequents at a given confidence.
///
/// Both sides are stored normalized and compressed, in canonical item order.
/// Equality is structural over antecedents, consequents, and confidence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommonSenseRule {
    antecedents: Vec<Vec<u8>>,
    consequents: Vec<Vec<u8>>,
    confidence: f64,
}

impl CommonSenseRule {
    /// Normalize, canonicalise, and compress a raw rule.
    pub fn new<I, S, J, T>(
        preprocessor: &Preprocessor,
        antecedents: I,
        consequents: J,
        confidence: f64,
    ) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
        J: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        Ok(CommonSenseRule {
            antecedents: preprocessor.compress_canonical(antecedents)?,
            consequents: preprocessor.compress_canonical(consequents)?,
            confidence,
        })
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub(crate) fn antecedents_compressed(&self) -> &[Vec<u8>] {
        &self.antecedents
    }

    pub(crate) fn consequents_compressed(&self) -> &[Vec<u8>] {
        &self.consequents
    }

    /// Decompressed antecedents, in canonical order.
    pub fn antecedents(&self, preprocessor: &Preprocessor) -> Result<Vec<String>> {
        self.antecedents
            .iter()
            .map(|item| preprocessor.codec().decompress(item))
            .collect()
    }

    /// Decompressed consequents, in canonical order.
    pub fn consequents(&self, preprocessor: &Preprocessor) -> Result<Vec<String>> {
        self.consequents
            .iter()
            .map(|item| preprocessor.codec().decompress(item))
            .collect()
    }

    /// The rule body as one set: consequents ∪ antecedents.
    pub(crate) fn itemset_union(&self) -> BTreeSet<Vec<u8>> {
        self.consequents
            .iter()
            .chain(self.antecedents.iter())
            .cloned()
            .collect()
    }
}

/// The deduplicated, minimised, canonically ordered set of common-sense
/// rules.
///
/// Minimisation after every batch union:
/// 1. per (antecedents, consequents) key only the highest confidence is kept;
/// 2. a rule whose antecedents strictly contain those of a kept rule with the
///    same consequents and the same confidence is subsumed and dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommonSenseRuleSet {
    rules: Vec<CommonSenseRule>,
}

impl CommonSenseRuleSet {
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in canonical order.
    pub fn rules(&self) -> &[CommonSenseRule] {
        &self.rules
    }

    pub fn iter(&self) -> impl Iterator<Item = &CommonSenseRule> {
        self.rules.iter()
    }

    /// Union the given batch into the set, then minimise and restore the
    /// canonical order.
    pub fn insert_batch(
        &mut self,
        batch: impl IntoIterator<Item = CommonSenseRule>,
        preprocessor: &Preprocessor,
    ) -> Result<()> {
        let mut best: BTreeMap<(Vec<Vec<u8>>, Vec<Vec<u8>>), f64> = BTreeMap::new();
        for rule in self.rules.drain(..).chain(batch) {
            let CommonSenseRule {
                antecedents,
                consequents,
                confidence,
            } = rule;
            let entry = best.entry((antecedents, consequents)).or_insert(confidence);
            if confidence > *entry {
                *entry = confidence;
            }
        }

        let rules: Vec<CommonSenseRule> = best
            .iter()
            .map(|((antecedents, consequents), &confidence)| CommonSenseRule {
                antecedents: antecedents.clone(),
                consequents: consequents.clone(),
                confidence,
            })
            .collect();
        let mut kept: Vec<CommonSenseRule> = rules
            .iter()
            .filter(|rule| {
                let antecedents: BTreeSet<&Vec<u8>> = rule.antecedents.iter().collect();
                !rules.iter().any(|other| {
                    other.consequents == rule.consequents
                        && other.confidence == rule.confidence
                        && other.antecedents.len() < rule.antecedents.len()
                        && other.antecedents.iter().all(|item| antecedents.contains(item))
                })
            })
            .cloned()
            .collect();

        Self::sort_canonical(&mut kept, preprocessor)?;
        self.rules = kept;
        Ok(())
    }

    /// Remove one structurally equal rule; no-op when absent.
    pub fn remove(&mut self, rule: &CommonSenseRule) {
        self.rules.retain(|existing| existing != rule);
    }

    /// Clear the whole set.
    pub fn clear(&mut self) {
        self.rules.clear();
    }

    /// Restore rules read from a snapshot without re-minimising.
    pub(crate) fn from_rules(rules: Vec<CommonSenseRule>) -> Self {
        CommonSenseRuleSet { rules }
    }

    /// Sort lexicographically on (antecedents, consequents, confidence),
    /// comparing decompressed forms.
    fn sort_canonical(rules: &mut [CommonSenseRule], preprocessor: &Preprocessor) -> Result<()> {
        let mut keys: Vec<(Vec<String>, Vec<String>, f64)> = Vec::with_capacity(rules.len());
        for rule in rules.iter() {
            keys.push((
                rule.antecedents(preprocessor)?,
                rule.consequents(preprocessor)?,
                rule.confidence,
            ));
        }
        let mut order: Vec<usize> = (0..rules.len()).collect();
        order.sort_by(|&a, &b| {
            keys[a]
                .0
                .cmp(&keys[b].0)
                .then_with(|| keys[a].1.cmp(&keys[b].1))
                .then_with(|| keys[a].2.total_cmp(&keys[b].2))
        });
        let reordered: Vec<CommonSenseRule> =
            order.iter().map(|&index| rules[index].clone()).collect();
        rules.clone_from_slice(&reordered);
        Ok(())
    }
}
