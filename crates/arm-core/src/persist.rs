//! Whole-image persistence of a database.
//!
//! The snapshot payload is one JSON document: settings, the flattened trie,
//! and the common-sense rule set. Versioning, checksums, and schema gating
//! live in the container (`arm-snapshot`).

use crate::common_sense::{CommonSenseRule, CommonSenseRuleSet};
use crate::database::Database;
use crate::preprocess::Preprocessor;
use arm_common::SCHEMA_VERSION;
use arm_config::Settings;
use arm_snapshot::{Result, SnapshotError, SnapshotReader, SnapshotWriter};
use arm_trie::{ItemsetsTrie, TrieSnapshot};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Payload file within the snapshot archive.
const DATABASE_FILE_NAME: &str = "database.json";

#[derive(Debug, Serialize, Deserialize)]
struct DatabasePayload {
    settings: Settings,
    trie: TrieSnapshot,
    common_sense_rules: Vec<CommonSenseRule>,
}

impl Database {
    /// Encode the full database image into a byte buffer.
    pub fn as_bytes(&self) -> Result<Vec<u8>> {
        let payload = DatabasePayload {
            settings: self.settings().clone(),
            trie: self.trie().to_snapshot(),
            common_sense_rules: self.common_sense_rule_set().rules().to_vec(),
        };
        let mut writer = SnapshotWriter::new(SCHEMA_VERSION, env!("CARGO_PKG_VERSION"))
            .with_rust_version(env!("CARGO_PKG_RUST_VERSION"));
        writer.add_json(DATABASE_FILE_NAME, &payload)?;
        writer.write_to_bytes()
    }

    /// Decode a database from a snapshot produced by [`Self::as_bytes`].
    ///
    /// Rejects snapshots whose schema version differs from
    /// [`SCHEMA_VERSION`] before decoding any payload.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Database> {
        let mut reader = SnapshotReader::from_bytes(bytes)?;
        reader.expect_schema_version(SCHEMA_VERSION)?;
        let payload: DatabasePayload = reader.read_json(DATABASE_FILE_NAME)?;
        Self::from_payload(payload)
    }

    /// Save the full database image to a file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let bytes = self.as_bytes()?;
        std::fs::write(path, bytes)?;
        Ok(())
    }

    /// Load a database image from a file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Database> {
        let mut reader = SnapshotReader::open(path.as_ref())?;
        reader.expect_schema_version(SCHEMA_VERSION)?;
        let payload: DatabasePayload = reader.read_json(DATABASE_FILE_NAME)?;
        Self::from_payload(payload)
    }

    fn from_payload(payload: DatabasePayload) -> Result<Database> {
        let preprocessor = Preprocessor::new(payload.settings)
            .map_err(|err| SnapshotError::CorruptedPayload(err.to_string()))?;
        let settings = preprocessor.settings();
        let trie = ItemsetsTrie::from_snapshot(
            &payload.trie,
            preprocessor.codec().clone(),
            preprocessor.normalized_consequents().clone(),
            settings.max_antecedents_length,
            settings.item_separator.clone(),
        )
        .map_err(|err| SnapshotError::CorruptedPayload(err.to_string()))?;
        let common_sense_rules = CommonSenseRuleSet::from_rules(payload.common_sense_rules);
        Ok(Database::from_parts(preprocessor, trie, common_sense_rules))
    }
}
