//! Error types for snapshot operations.

use thiserror::Error;

/// Errors that can occur while writing or reading a snapshot.
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// ZIP archive error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Checksum verification failed
    #[error("checksum mismatch for '{path}': expected {expected}, got {actual}")]
    ChecksumMismatch {
        path: String,
        expected: String,
        actual: String,
    },

    /// Missing required file in the snapshot
    #[error("missing required file: {0}")]
    MissingFile(String),

    /// Snapshot was produced under a different database schema version
    #[error("snapshot schema version '{found}' is incompatible with '{expected}'")]
    SchemaMismatch { found: String, expected: String },

    /// Payload decoded but failed domain validation
    #[error("corrupted snapshot payload: {0}")]
    CorruptedPayload(String),
}

/// Result type alias for snapshot operations.
pub type Result<T> = std::result::Result<T, SnapshotError>;
