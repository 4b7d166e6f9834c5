//! Error types for the association-rule mining core.
//!
//! Every recoverable failure of the mining core surfaces as one variant of
//! [`Error`]. Options such as `silent`, `skip_unknown_items`, or
//! `none_if_not_exists` are the only places where a failure is absorbed
//! instead of propagated; everything else bubbles up to the caller.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias for mining operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by the mining core.
#[derive(Error, Debug)]
pub enum Error {
    /// Compression encountered a character outside the configured alphabet.
    #[error(
        "character '{ch}' does not exist in the item alphabet '{alphabet}'; \
         extend the alphabet or fix the offending item"
    )]
    InvalidItemChar { ch: char, alphabet: String },

    /// A trie lookup for a required itemset failed.
    #[error(
        "itemset '{itemset}' could not be found; ensure a corresponding \
         transaction was inserted before and that normalization is considered"
    )]
    UnknownItemset { itemset: String },

    /// A lookup was called with an empty itemset.
    #[error("the given itemset is empty")]
    EmptyItemset,

    /// Rule derivation was invoked without declared consequents.
    #[error(
        "cannot derive rules because no consequents are declared; pass the \
         consequent(s) of interest when creating the database"
    )]
    NoConsequents,

    /// The predictor was asked for a consequent that was never declared.
    #[error("'{consequent}' has not been declared as a consequent of this database")]
    UnknownConsequent { consequent: String },

    /// Removal of a transaction that was never inserted.
    #[error("transaction '{transaction}' cannot be removed because it was not inserted before")]
    TransactionNotFound { transaction: String },

    /// Removal on a database without any transactions.
    #[error("the database is empty; there are no transactions to remove")]
    EmptyDatabase,

    /// Merging requires both databases to use identical settings.
    #[error(
        "cannot merge databases because they use different settings; \
         ensure all databases are created with the same settings"
    )]
    SettingsMismatch,

    /// A numeric parameter was outside its valid range.
    #[error("parameter '{parameter}' must be between {min} and {max}, got {value}")]
    RangeError {
        parameter: &'static str,
        min: f64,
        max: f64,
        value: f64,
    },
}

impl Error {
    /// Stable machine-readable code for this error kind.
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::InvalidItemChar { .. } => ErrorCode::InvalidItemChar,
            Error::UnknownItemset { .. } => ErrorCode::UnknownItemset,
            Error::EmptyItemset => ErrorCode::EmptyItemset,
            Error::NoConsequents => ErrorCode::NoConsequents,
            Error::UnknownConsequent { .. } => ErrorCode::UnknownConsequent,
            Error::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            Error::EmptyDatabase => ErrorCode::EmptyDatabase,
            Error::SettingsMismatch => ErrorCode::SettingsMismatch,
            Error::RangeError { .. } => ErrorCode::RangeError,
        }
    }
}

/// Machine-parseable error codes, stable across releases.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    InvalidItemChar,
    UnknownItemset,
    EmptyItemset,
    NoConsequents,
    UnknownConsequent,
    TransactionNotFound,
    EmptyDatabase,
    SettingsMismatch,
    RangeError,
}
