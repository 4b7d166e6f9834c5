//! Shared fixtures for the integration tests.
//!
//! The small reference corpus comes from the Wikipedia article on
//! association rule learning.
#![allow(dead_code)]

use arm_core::{Database, Settings};

pub const WIKIPEDIA_TRANSACTIONS: [&[&str]; 5] = [
    &["milk", "bread"],
    &["butter"],
    &["beer", "diapers"],
    &["milk", "bread", "butter"],
    &["bread"],
];

pub fn wikipedia_database(consequents: &[&str]) -> Database {
    let mut database = Database::new(Settings::new(consequents.iter().copied())).unwrap();
    for transaction in WIKIPEDIA_TRANSACTIONS {
        database.insert_transaction(transaction.iter().copied()).unwrap();
    }
    database
}

pub fn wikipedia_database_no_consequents() -> Database {
    wikipedia_database(&[])
}

pub fn wikipedia_database_consequent_bread() -> Database {
    wikipedia_database(&["bread"])
}

pub fn wikipedia_database_consequent_bread_and_milk() -> Database {
    wikipedia_database(&["bread", "milk"])
}
