//! Fuzz target for transaction insertion and removal.
//!
//! Arbitrary item strings must either be rejected by the codec or leave the
//! trie in a consistent state after an insert/remove cycle.

#![no_main]

use arm_core::{Database, Settings};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|transactions: Vec<Vec<String>>| {
    let settings = Settings::new(["target"]).with_max_antecedents_length(Some(3));
    let Ok(mut database) = Database::new(settings) else {
        return;
    };
    for transaction in &transactions {
        let before = database.number_transactions();
        if database
            .insert_transaction(transaction.iter().map(String::as_str))
            .is_ok()
        {
            assert_eq!(database.number_transactions(), before + 1);
            database
                .remove_transaction(transaction.iter().map(String::as_str), false)
                .unwrap();
            assert_eq!(database.number_transactions(), before);
        }
    }
});
