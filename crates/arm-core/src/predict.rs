//! Posterior prediction of consequents from given antecedents.

use crate::common_sense::CommonSenseRuleSet;
use crate::preprocess::Preprocessor;
use arm_common::{Error, Result};
use arm_trie::{ItemsetsTrie, MissingItems};
use serde::Serialize;
use std::cmp::Ordering;
use std::collections::BTreeSet;

/// One row of the prediction table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Prediction {
    /// Normalized antecedents the prediction is conditioned on.
    pub antecedents: Vec<String>,
    pub consequent: String,
    /// `None` when the probability cannot be determined from the data
    /// (unknown item with skipping off, or a path never observed).
    pub probability: Option<f64>,
}

/// Compute `P(consequent | antecedents)` for each target consequent.
///
/// Common-sense rules short-circuit the trie: a rule whose consequents
/// contain the target and whose antecedents match the given ones (exactly,
/// or as a subset when `skip_unknown_antecedents` is set) contributes its
/// confidence directly. Otherwise the probability is the ratio of two
/// support lookups. Results are sorted by probability descending, unknown
/// probabilities last, ties by consequent.
pub(crate) fn predict_consequents<S: AsRef<str>>(
    trie: &ItemsetsTrie,
    preprocessor: &Preprocessor,
    common_sense: &CommonSenseRuleSet,
    antecedents: &[S],
    consequents: Option<&[S]>,
    skip_unknown_antecedents: bool,
) -> Result<Vec<Prediction>> {
    let targets: Vec<String> = match consequents {
        Some(requested) => {
            let mut targets = Vec::with_capacity(requested.len());
            for consequent in requested {
                let normalized = preprocessor.normalize(consequent.as_ref());
                if !preprocessor.is_consequent(&normalized) {
                    return Err(Error::UnknownConsequent {
                        consequent: normalized,
                    });
                }
                targets.push(normalized);
            }
            targets
        }
        None => preprocessor.normalized_consequents().iter().cloned().collect(),
    };

    let normalized_antecedents: Vec<String> = {
        let normalized = preprocessor.normalize_itemset(antecedents.iter().map(AsRef::as_ref));
        let (_, sorted_antecedents) = preprocessor.partition(&normalized);
        sorted_antecedents
    };
    let antecedents_compressed: Vec<Vec<u8>> = normalized_antecedents
        .iter()
        .map(|item| preprocessor.compress_item(item))
        .collect::<Result<_>>()?;
    let antecedents_set: BTreeSet<Vec<u8>> = antecedents_compressed.iter().cloned().collect();

    let mut predictions = Vec::with_capacity(targets.len());
    for target in targets {
        let probability = predict_one(
            trie,
            preprocessor,
            common_sense,
            &target,
            &antecedents_compressed,
            &antecedents_set,
            skip_unknown_antecedents,
        )?;
        predictions.push(Prediction {
            antecedents: normalized_antecedents.clone(),
            consequent: target,
            probability,
        });
    }

    predictions.sort_by(|a, b| match (a.probability, b.probability) {
        (Some(left), Some(right)) => right
            .total_cmp(&left)
            .then_with(|| a.consequent.cmp(&b.consequent)),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => a.consequent.cmp(&b.consequent),
    });
    Ok(predictions)
}

fn predict_one(
    trie: &ItemsetsTrie,
    preprocessor: &Preprocessor,
    common_sense: &CommonSenseRuleSet,
    target: &str,
    antecedents: &[Vec<u8>],
    antecedents_set: &BTreeSet<Vec<u8>>,
    skip_unknown_antecedents: bool,
) -> Result<Option<f64>> {
    let target_compressed = preprocessor.compress_item(target)?;

    // Expert knowledge first: the first matching rule in canonical order
    // decides.
    for rule in common_sense.iter() {
        if !rule
            .consequents_compressed()
            .iter()
            .any(|item| *item == target_compressed)
        {
            continue;
        }
        let rule_antecedents: BTreeSet<&Vec<u8>> = rule.antecedents_compressed().iter().collect();
        let matches = if skip_unknown_antecedents {
            rule_antecedents
                .iter()
                .all(|item| antecedents_set.contains(*item))
        } else {
            rule_antecedents.len() == antecedents_set.len()
                && rule_antecedents
                    .iter()
                    .all(|item| antecedents_set.contains(*item))
        };
        if matches {
            return Ok(Some(rule.confidence()));
        }
    }

    let missing = if skip_unknown_antecedents {
        MissingItems::Skip
    } else {
        MissingItems::ReturnNone
    };

    // No antecedents: the prior of the target.
    if antecedents.is_empty() {
        let node = trie.get_node_from_compressed(&[target_compressed], MissingItems::ReturnNone)?;
        return Ok(node.map(|id| trie.support(id)));
    }

    // Skipping is meant for unknown antecedents only; a target consequent
    // that was never observed has no probability.
    if skip_unknown_antecedents
        && trie
            .get_node_from_compressed(
                std::slice::from_ref(&target_compressed),
                MissingItems::ReturnNone,
            )?
            .is_none()
    {
        return Ok(None);
    }

    // Canonical path: the target consequent first, then the antecedents.
    let mut numerator_path = Vec::with_capacity(antecedents.len() + 1);
    numerator_path.push(target_compressed);
    numerator_path.extend(antecedents.iter().cloned());

    let Some(numerator) = trie.get_node_from_compressed(&numerator_path, missing)? else {
        return Ok(None);
    };
    let Some(denominator) = trie.get_node_from_compressed(antecedents, missing)? else {
        return Ok(None);
    };
    let denominator_support = trie.support(denominator);
    if denominator_support <= 0.0 {
        return Ok(None);
    }
    Ok(Some(trie.support(numerator) / denominator_support))
}
