//! Rule derivation with redundancy elimination.
//!
//! Rules are derived breadth-first from the first-antecedent frontier, level
//! by antecedent count. A candidate is dropped when a previously emitted or
//! common-sense rule over a subset of its items already predicts the same
//! consequents at the same (or tolerated) confidence, and a node with
//! confidence 1 never descends: every rule below it would be redundant.

use crate::common_sense::CommonSenseRuleSet;
use crate::filters::RuleFilters;
use crate::preprocess::Preprocessor;
use arm_common::{Error, Result};
use arm_trie::{ItemsetsTrie, NodeId, VisitorControl};
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

/// One row of the derived-rules table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedRule {
    /// Decompressed antecedents in canonical order.
    pub antecedents: Vec<String>,
    /// Decompressed consequents in canonical order.
    pub consequents: Vec<String>,
    pub confidence: f64,
    pub lift: f64,
    pub occurrences: u64,
    pub support: f64,
    pub antecedents_length: usize,
    pub consequents_length: usize,
}

/// Redundancy set: previously known rule bodies with their confidences.
struct RedundancySet {
    entries: Vec<(BTreeSet<Vec<u8>>, f64)>,
}

impl RedundancySet {
    fn seeded_from(rules: &CommonSenseRuleSet) -> Self {
        RedundancySet {
            entries: rules
                .iter()
                .map(|rule| (rule.itemset_union(), rule.confidence()))
                .collect(),
        }
    }

    /// A candidate is redundant when a known body is contained in it and the
    /// known rule is certain, or close enough in confidence.
    fn covers(&self, candidate: &BTreeSet<Vec<u8>>, confidence: f64, tolerance: f64) -> bool {
        self.entries.iter().any(|(itemset, known)| {
            itemset.is_subset(candidate)
                && (*known == 1.0 || (known - confidence).abs() <= tolerance)
        })
    }

    fn shadow(&mut self, itemset: BTreeSet<Vec<u8>>, confidence: f64) {
        self.entries.push((itemset, confidence));
    }
}

/// Derive rules from the trie. See [`crate::Database::derive_rules`].
pub(crate) fn derive_rules(
    trie: &ItemsetsTrie,
    preprocessor: &Preprocessor,
    common_sense: &CommonSenseRuleSet,
    filters: &RuleFilters,
    non_antecedents_rules: bool,
    omit_column_names: bool,
) -> Result<Vec<DerivedRule>> {
    if preprocessor.normalized_consequents().is_empty() {
        return Err(Error::NoConsequents);
    }

    let mut redundancy = RedundancySet::seeded_from(common_sense);
    let mut result = Vec::new();

    if non_antecedents_rules {
        collect_non_antecedent_rules(trie, preprocessor, filters, omit_column_names, &mut result)?;
    }

    let mut level: Vec<NodeId> = trie.first_antecedent_frontier();
    let mut antecedents_length = 1;
    while !level.is_empty() {
        if filters
            .max_antecedents_length
            .is_some_and(|max| antecedents_length > max)
        {
            break;
        }
        let mut next_level = Vec::new();
        for node in level {
            let confidence = trie.confidence(node)?;

            // A rule with its parent's confidence duplicates the parent's
            // rule; frontier nodes (consequent parents) always qualify.
            let parent = trie.parent(node);
            let parent_qualifies = match parent {
                Some(parent) => {
                    trie.is_consequent(parent) || confidence != trie.confidence(parent)?
                }
                None => true,
            };
            if parent_qualifies {
                let occurrences = trie.occurrences(node);
                let support = trie.support(node);
                let lift = trie.lift(node)?;
                if filters.matches(confidence, support, lift, occurrences) {
                    let (consequents, antecedents) = trie.path_split(node);
                    let candidate: BTreeSet<Vec<u8>> =
                        consequents.iter().chain(antecedents.iter()).cloned().collect();
                    if !redundancy.covers(&candidate, confidence, filters.confidence_tolerance) {
                        result.push(build_rule(
                            preprocessor,
                            &antecedents,
                            &consequents,
                            confidence,
                            lift,
                            occurrences,
                            support,
                            omit_column_names,
                        )?);
                        redundancy.shadow(candidate, confidence);
                    }
                }
            }

            // Descent gate: below a certain rule everything is redundant.
            if confidence != 1.0 {
                next_level.extend(trie.children_in_order(node));
            }
        }
        level = next_level;
        antecedents_length += 1;
    }

    Ok(result)
}

/// Emit one rule per consequent-only node that passes the filters; such a
/// rule has no antecedents and confidence and lift of 1.
fn collect_non_antecedent_rules(
    trie: &ItemsetsTrie,
    preprocessor: &Preprocessor,
    filters: &RuleFilters,
    omit_column_names: bool,
    result: &mut Vec<DerivedRule>,
) -> Result<()> {
    let mut error = None;
    trie.visit_depth_first(true, |id, _| {
        if !trie.is_consequent(id) {
            return VisitorControl::SkipChildren;
        }
        let occurrences = trie.occurrences(id);
        let support = trie.support(id);
        if filters.matches(1.0, support, 1.0, occurrences) {
            let (consequents, antecedents) = trie.path_split(id);
            match build_rule(
                preprocessor,
                &antecedents,
                &consequents,
                1.0,
                1.0,
                occurrences,
                support,
                omit_column_names,
            ) {
                Ok(rule) => result.push(rule),
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
        None => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn build_rule(
    preprocessor: &Preprocessor,
    antecedents: &[Vec<u8>],
    consequents: &[Vec<u8>],
    confidence: f64,
    lift: f64,
    occurrences: u64,
    support: f64,
    omit_column_names: bool,
) -> Result<DerivedRule> {
    let decompress = |items: &[Vec<u8>]| -> Result<Vec<String>> {
        let mut decompressed: Vec<String> = items
            .iter()
            .map(|item| preprocessor.codec().decompress(item))
            .collect::<Result<_>>()?;
        if omit_column_names {
            decompressed = preprocessor.strip_column_names(&decompressed);
        }
        Ok(decompressed)
    };
    let antecedents = decompress(antecedents)?;
    let consequents = decompress(consequents)?;
    Ok(DerivedRule {
        antecedents_length: antecedents.len(),
        consequents_length: consequents.len(),
        antecedents,
        consequents,
        confidence,
        lift,
        occurrences,
        support,
    })
}

/// Merge two derived rule tables: rows are deduplicated by (antecedents,
/// consequents), keeping the higher confidence; the result is ordered by
/// (antecedents, consequents).
pub fn merge_rule_tables(left: &[DerivedRule], right: &[DerivedRule]) -> Vec<DerivedRule> {
    let mut merged: BTreeMap<(Vec<String>, Vec<String>), DerivedRule> = BTreeMap::new();
    for rule in left.iter().chain(right.iter()) {
        let key = (rule.antecedents.clone(), rule.consequents.clone());
        match merged.get(&key) {
            Some(existing) if existing.confidence >= rule.confidence => {}
            _ => {
                merged.insert(key, rule.clone());
            }
        }
    }
    merged.into_values().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(antecedents: &[&str], confidence: f64) -> DerivedRule {
        DerivedRule {
            antecedents: antecedents.iter().map(|s| s.to_string()).collect(),
            consequents: vec!["bread".to_string()],
            confidence,
            lift: 1.0,
            occurrences: 1,
            support: 0.5,
            antecedents_length: antecedents.len(),
            consequents_length: 1,
        }
    }

    #[test]
    fn merging_rule_tables_keeps_the_stronger_duplicate() {
        let left = vec![rule(&["butter"], 0.5), rule(&["milk"], 0.8)];
        let right = vec![rule(&["butter"], 0.7)];
        let merged = merge_rule_tables(&left, &right);
        assert_eq!(merged.len(), 2);
        let butter = merged
            .iter()
            .find(|rule| rule.antecedents == vec!["butter"])
            .unwrap();
        assert_eq!(butter.confidence, 0.7);
    }
}
