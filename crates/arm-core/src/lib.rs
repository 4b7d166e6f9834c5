//! Armery: interactive association-rule mining around declared consequents.
//!
//! A [`Database`] accumulates transactions in an itemsets trie keyed by a
//! consequents-first canonical order. Because the consequents of interest are
//! declared up front, only itemsets that can contribute to a rule predicting
//! one of them need to be materialised, and mining becomes interactive:
//! frequent itemsets, filtered rules with redundancy elimination against a
//! common-sense knowledge base, and posterior predictions are all answered
//! from the same structure.
//!
//! ```no_run
//! use arm_core::{Database, RuleFilters, Settings};
//!
//! # fn main() -> arm_common::Result<()> {
//! let mut database = Database::new(Settings::new(["bread"]))?;
//! database.insert_transaction(["milk", "bread"])?;
//! database.insert_transaction(["butter"])?;
//! let rules = database.derive_rules(&RuleFilters::default(), false, false)?;
//! # Ok(())
//! # }
//! ```

pub mod common_sense;
pub mod database;
pub mod filters;
pub mod itemsets;
pub mod persist;
pub mod predict;
pub mod preprocess;
pub mod rules;

pub use arm_common::{Error, Result, SCHEMA_VERSION};
pub use arm_config::Settings;
pub use arm_snapshot::SnapshotError;
pub use common_sense::{CommonSenseRule, CommonSenseRuleSet};
pub use database::Database;
pub use filters::{ItemsetFilters, RuleFilters};
pub use itemsets::FrequentItemset;
pub use predict::Prediction;
pub use rules::{merge_rule_tables, DerivedRule};
