//! Snapshot manifest types and serialization.
//!
//! The manifest is the source of truth for a snapshot's contents: the
//! versions that produced the image, when it was taken, and a checksum per
//! payload file.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Version of the container layout itself (ZIP + manifest).
pub const SNAPSHOT_FORMAT_VERSION: &str = "1.0.0";

/// Manifest file name within the snapshot.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Snapshot manifest containing metadata and file checksums.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SnapshotManifest {
    /// Container layout version.
    pub format_version: String,

    /// Database schema version of the payload.
    pub schema_version: String,

    /// Version of the package that wrote the snapshot.
    pub package_version: String,

    /// Minimum Rust toolchain the writing package was built for.
    pub rust_version: String,

    /// Unique id of this snapshot.
    pub snapshot_id: Uuid,

    /// When the snapshot was taken.
    pub created_at: DateTime<Utc>,

    /// Payload files with checksums.
    pub files: Vec<FileEntry>,

    /// Optional description or notes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl SnapshotManifest {
    /// Create a manifest for the given schema and package versions.
    pub fn new(schema_version: impl Into<String>, package_version: impl Into<String>) -> Self {
        SnapshotManifest {
            format_version: SNAPSHOT_FORMAT_VERSION.to_string(),
            schema_version: schema_version.into(),
            package_version: package_version.into(),
            rust_version: String::new(),
            snapshot_id: Uuid::new_v4(),
            created_at: Utc::now(),
            files: Vec::new(),
            description: None,
        }
    }

    /// Set the Rust toolchain version.
    pub fn with_rust_version(mut self, version: impl Into<String>) -> Self {
        self.rust_version = version.into();
        self
    }

    /// Set the snapshot description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Add a payload file entry.
    pub fn add_file(&mut self, entry: FileEntry) {
        self.files.push(entry);
    }

    /// Find a file entry by path.
    pub fn find_file(&self, path: &str) -> Option<&FileEntry> {
        self.files.iter().find(|entry| entry.path == path)
    }

    /// Sort file entries by path for deterministic output.
    pub fn sort_files(&mut self) {
        self.files.sort_by(|a, b| a.path.cmp(&b.path));
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Parse from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }
}

/// One payload file with its checksum.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// Path within the archive.
    pub path: String,

    /// SHA-256 of the file contents, hex-encoded.
    pub sha256: String,

    /// Uncompressed size in bytes.
    pub bytes: u64,
}

impl FileEntry {
    pub fn new(path: impl Into<String>, sha256: impl Into<String>, bytes: u64) -> Self {
        FileEntry {
            path: path.into(),
            sha256: sha256.into(),
            bytes,
        }
    }

    /// Compute the hex-encoded SHA-256 of the given data.
    pub fn compute_checksum(data: &[u8]) -> String {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hex::encode(hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manifest_roundtrips_through_json() {
        let mut manifest = SnapshotManifest::new("1.0.0", "0.1.0").with_rust_version("1.88");
        manifest.add_file(FileEntry::new("database.json", "abc", 3));
        let json = manifest.to_json().unwrap();
        let decoded = SnapshotManifest::from_json(&json).unwrap();
        assert_eq!(decoded.schema_version, "1.0.0");
        assert_eq!(decoded.files.len(), 1);
        assert_eq!(decoded.snapshot_id, manifest.snapshot_id);
    }

    #[test]
    fn checksum_is_stable_hex_sha256() {
        let checksum = FileEntry::compute_checksum(b"hello");
        assert_eq!(
            checksum,
            "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
        );
    }
}
