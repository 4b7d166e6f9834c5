//! Whole-image snapshots: bytes and files.

mod common;

use arm_core::{Database, ItemsetFilters, RuleFilters, Settings, SnapshotError};
use common::wikipedia_database_consequent_bread;

#[test]
fn save_and_load_a_file_keeps_the_database_usable() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("groceries.armery");

    let mut database = Database::new(Settings::new(["bread"])).unwrap();
    database
        .insert_common_sense_rule(["milk"], ["bread"], 1.0)
        .unwrap();
    database
        .insert_common_sense_rule(["butter"], ["bread"], 1.0)
        .unwrap();
    database.insert_transaction(["milk", "bread"]).unwrap();
    database.insert_transaction(["butter"]).unwrap();

    database.save_to_file(&path).unwrap();
    let mut database = Database::load_from_file(&path).unwrap();

    database.insert_transaction(["milk", "bread", "butter"]).unwrap();
    database.insert_transaction(["bread"]).unwrap();

    assert_eq!(database.number_transactions(), 4);
    assert_eq!(database.get_common_sense_rules().len(), 2);
    assert!(!database
        .derive_frequent_itemsets(&ItemsetFilters::default(), false)
        .unwrap()
        .is_empty());
    assert!(!database
        .derive_rules(&RuleFilters::default(), true, false)
        .unwrap()
        .is_empty());
}

#[test]
fn byte_roundtrip_preserves_every_table() {
    let database = wikipedia_database_consequent_bread();
    let restored = Database::from_bytes(database.as_bytes().unwrap()).unwrap();

    assert_eq!(restored.number_transactions(), database.number_transactions());
    assert_eq!(restored.number_nodes(), database.number_nodes());
    assert_eq!(restored.settings(), database.settings());
    assert_eq!(
        restored
            .derive_frequent_itemsets(&ItemsetFilters::default(), false)
            .unwrap(),
        database
            .derive_frequent_itemsets(&ItemsetFilters::default(), false)
            .unwrap()
    );
    assert_eq!(
        restored.derive_rules(&RuleFilters::default(), true, false).unwrap(),
        database.derive_rules(&RuleFilters::default(), true, false).unwrap()
    );
    assert_eq!(
        restored.render_trie().unwrap(),
        database.render_trie().unwrap()
    );
}

#[test]
fn snapshots_can_be_merged_after_loading() {
    let database = wikipedia_database_consequent_bread();
    let mut restored = Database::from_bytes(database.as_bytes().unwrap()).unwrap();
    restored.merge_with(&database).unwrap();
    assert_eq!(restored.number_transactions(), 10);
}

#[test]
fn corrupted_bytes_are_rejected() {
    let database = wikipedia_database_consequent_bread();
    let mut bytes = database.as_bytes().unwrap();
    bytes.truncate(bytes.len() / 2);
    assert!(Database::from_bytes(bytes).is_err());
}

#[test]
fn snapshot_records_the_schema_version() {
    let database = wikipedia_database_consequent_bread();
    let bytes = database.as_bytes().unwrap();
    let reader = arm_snapshot::SnapshotReader::from_bytes(bytes).unwrap();
    assert_eq!(reader.manifest().schema_version, arm_core::SCHEMA_VERSION);
    assert!(matches!(
        reader.expect_schema_version("0.0.0"),
        Err(SnapshotError::SchemaMismatch { .. })
    ));
}
