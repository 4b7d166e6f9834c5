//! Merging databases built independently under equal settings.

mod common;

use arm_core::{Database, Error, ItemsetFilters, RuleFilters, Settings};
use common::WIKIPEDIA_TRANSACTIONS;

fn database_with(consequents: &[&str], transactions: &[&[&str]]) -> Database {
    let mut database = Database::new(Settings::new(consequents.iter().copied())).unwrap();
    for transaction in transactions {
        database.insert_transaction(transaction.iter().copied()).unwrap();
    }
    database
}

#[test]
fn merging_halves_equals_building_from_the_union() {
    let first = database_with(&["bread", "milk"], &WIKIPEDIA_TRANSACTIONS[..2]);
    let second = database_with(&["bread", "milk"], &WIKIPEDIA_TRANSACTIONS[2..]);
    let union = database_with(&["bread", "milk"], &WIKIPEDIA_TRANSACTIONS);

    let mut merged = first;
    merged.merge_with(&second).unwrap();

    assert_eq!(merged.number_transactions(), union.number_transactions());
    assert_eq!(merged.number_nodes(), union.number_nodes());
    assert_eq!(
        merged
            .derive_frequent_itemsets(&ItemsetFilters::default(), false)
            .unwrap(),
        union
            .derive_frequent_itemsets(&ItemsetFilters::default(), false)
            .unwrap()
    );
    assert_eq!(
        merged.derive_rules(&RuleFilters::default(), true, false).unwrap(),
        union.derive_rules(&RuleFilters::default(), true, false).unwrap()
    );
    assert_eq!(merged.render_trie().unwrap(), union.render_trie().unwrap());
}

#[test]
fn merging_a_copied_database_doubles_every_counter() {
    let database = database_with(&["bread"], &WIKIPEDIA_TRANSACTIONS);
    let copy = database.clone();
    let mut merged = database;
    merged.merge_with(&copy).unwrap();
    assert_eq!(merged.number_transactions(), 10);
    let row = merged
        .get_itemset(["bread"], false, false)
        .unwrap()
        .unwrap();
    assert_eq!(row.occurrences, 6);
    assert!((row.support - 0.6).abs() < 1e-12);
}

#[test]
fn merge_many_accumulates_all_databases() {
    let first = database_with(&["bread", "milk"], &[&["milk", "bread"], &["butter"]]);
    let second = database_with(&["bread", "milk"], &[&["bread", "coke"], &["milk", "honey"]]);
    let third = database_with(&["bread", "milk"], &[&["candy"], &["mustard", "salad"]]);

    let merged = Database::merge_many(vec![first, second, third]).unwrap();

    assert_eq!(merged.number_transactions(), 6);
    assert_eq!(merged.number_nodes(), 13);

    let itemsets = merged
        .derive_frequent_itemsets(&ItemsetFilters::default(), false)
        .unwrap();
    assert_eq!(itemsets.len(), 12);

    let rules = merged.derive_rules(&RuleFilters::default(), true, false).unwrap();
    assert_eq!(rules.len(), 5);
}

#[test]
fn merging_with_different_settings_fails() {
    let first = database_with(&["milk"], &[]);
    let second = database_with(&["bread"], &[]);
    let mut merged = first;
    assert!(matches!(
        merged.merge_with(&second),
        Err(Error::SettingsMismatch)
    ));
}

#[test]
fn merge_many_without_databases_fails() {
    assert!(Database::merge_many(Vec::new()).is_err());
}

#[test]
fn common_sense_rules_are_merged_and_minimised() {
    let mut first = database_with(&["bread"], &[]);
    first
        .insert_common_sense_rule(["milk"], ["bread"], 0.7)
        .unwrap();
    let mut second = database_with(&["bread"], &[]);
    second
        .insert_common_sense_rule(["milk"], ["bread"], 1.0)
        .unwrap();
    second
        .insert_common_sense_rule(["butter"], ["bread"], 0.4)
        .unwrap();

    first.merge_with(&second).unwrap();
    let rules = first.get_common_sense_rules();
    assert_eq!(rules.len(), 2);
    assert!((rules[1].confidence() - 1.0).abs() < 1e-12);
}
