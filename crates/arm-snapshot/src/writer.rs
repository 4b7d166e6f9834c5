//! Snapshot writer.
//!
//! Collects JSON payloads in memory and emits one ZIP archive with the
//! manifest first and checksummed payload files after it.

use crate::{FileEntry, Result, SnapshotError, SnapshotManifest};
use std::fs::File;
use std::io::{Cursor, Write};
use std::path::Path;
use tracing::{debug, info};
use zip::write::{FileOptions, ZipWriter};
use zip::CompressionMethod;

/// Builder for snapshot archives.
pub struct SnapshotWriter {
    manifest: SnapshotManifest,
    files: Vec<(String, Vec<u8>)>,
}

impl SnapshotWriter {
    /// Create a writer for the given schema and package versions.
    pub fn new(schema_version: impl Into<String>, package_version: impl Into<String>) -> Self {
        SnapshotWriter {
            manifest: SnapshotManifest::new(schema_version, package_version),
            files: Vec::new(),
        }
    }

    /// Set the Rust toolchain version recorded in the manifest.
    pub fn with_rust_version(mut self, version: impl Into<String>) -> Self {
        self.manifest = self.manifest.with_rust_version(version);
        self
    }

    /// Set the snapshot description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.manifest = self.manifest.with_description(description);
        self
    }

    /// Add a JSON-serializable value as a payload file.
    pub fn add_json<T: serde::Serialize>(
        &mut self,
        path: impl Into<String>,
        value: &T,
    ) -> Result<()> {
        let path = path.into();
        let data = serde_json::to_string_pretty(value)?.into_bytes();
        let checksum = FileEntry::compute_checksum(&data);
        let bytes = data.len() as u64;
        self.manifest.add_file(FileEntry::new(&path, checksum, bytes));
        debug!(path = %path, bytes, "added payload to snapshot");
        self.files.push((path, data));
        Ok(())
    }

    /// Current manifest, for inspection before writing.
    pub fn manifest(&self) -> &SnapshotManifest {
        &self.manifest
    }

    /// Encode the snapshot into a byte buffer.
    pub fn write_to_bytes(mut self) -> Result<Vec<u8>> {
        if self.files.is_empty() {
            return Err(SnapshotError::MissingFile("<payload>".to_string()));
        }
        self.manifest.sort_files();
        self.files.sort_by(|a, b| a.0.cmp(&b.0));
        let manifest_json = self.manifest.to_json()?;

        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let options: FileOptions<'_, ()> = FileOptions::default()
            .compression_method(CompressionMethod::Deflated)
            .unix_permissions(0o644);

        zip.start_file(crate::MANIFEST_FILE_NAME, options)?;
        zip.write_all(manifest_json.as_bytes())?;
        for (path, data) in &self.files {
            zip.start_file(path.as_str(), options)?;
            zip.write_all(data)?;
        }
        let cursor = zip.finish()?;

        info!(
            files = self.files.len(),
            bytes = cursor.get_ref().len(),
            schema_version = %self.manifest.schema_version,
            "snapshot encoded"
        );
        Ok(cursor.into_inner())
    }

    /// Write the snapshot to a file.
    pub fn write_to_file(self, path: &Path) -> Result<()> {
        let bytes = self.write_to_bytes()?;
        let mut file = File::create(path)?;
        file.write_all(&bytes)?;
        info!(path = %path.display(), bytes = bytes.len(), "snapshot written");
        Ok(())
    }
}
