//! Snapshot reader with integrity verification.

use crate::{Result, SnapshotError, SnapshotManifest, MANIFEST_FILE_NAME, SNAPSHOT_FORMAT_VERSION};
use serde::de::DeserializeOwned;
use std::fs::File;
use std::io::{Cursor, Read, Seek};
use std::path::Path;
use tracing::{debug, info, warn};
use zip::ZipArchive;

/// Reader for snapshot archives.
pub struct SnapshotReader<R: Read + Seek> {
    manifest: SnapshotManifest,
    archive: ZipArchive<R>,
}

impl SnapshotReader<File> {
    /// Open a snapshot from a file path.
    pub fn open(path: &Path) -> Result<Self> {
        Self::from_reader(File::open(path)?)
    }
}

impl SnapshotReader<Cursor<Vec<u8>>> {
    /// Open a snapshot from bytes.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        Self::from_reader(Cursor::new(bytes))
    }
}

impl<R: Read + Seek> SnapshotReader<R> {
    /// Create a reader from any `Read + Seek` source.
    pub fn from_reader(reader: R) -> Result<Self> {
        let mut archive = ZipArchive::new(reader)?;
        let manifest = Self::read_manifest(&mut archive)?;
        info!(
            snapshot_id = %manifest.snapshot_id,
            schema_version = %manifest.schema_version,
            files = manifest.files.len(),
            "snapshot opened"
        );
        Ok(SnapshotReader { manifest, archive })
    }

    fn read_manifest(archive: &mut ZipArchive<R>) -> Result<SnapshotManifest> {
        let mut file = archive
            .by_name(MANIFEST_FILE_NAME)
            .map_err(|_| SnapshotError::MissingFile(MANIFEST_FILE_NAME.to_string()))?;
        let mut json = String::new();
        file.read_to_string(&mut json)?;
        let manifest = SnapshotManifest::from_json(&json)?;
        if manifest.format_version != SNAPSHOT_FORMAT_VERSION {
            warn!(
                format_version = %manifest.format_version,
                supported = SNAPSHOT_FORMAT_VERSION,
                "snapshot container version differs"
            );
        }
        Ok(manifest)
    }

    /// The snapshot manifest.
    pub fn manifest(&self) -> &SnapshotManifest {
        &self.manifest
    }

    /// Reject the snapshot unless it carries the expected schema version.
    pub fn expect_schema_version(&self, expected: &str) -> Result<()> {
        if self.manifest.schema_version != expected {
            return Err(SnapshotError::SchemaMismatch {
                found: self.manifest.schema_version.clone(),
                expected: expected.to_string(),
            });
        }
        Ok(())
    }

    /// Read a payload file with checksum verification.
    pub fn read_verified(&mut self, path: &str) -> Result<Vec<u8>> {
        let entry = self
            .manifest
            .find_file(path)
            .ok_or_else(|| SnapshotError::MissingFile(path.to_string()))?
            .clone();
        let mut file = self
            .archive
            .by_name(path)
            .map_err(|_| SnapshotError::MissingFile(path.to_string()))?;
        let mut data = Vec::new();
        file.read_to_end(&mut data)?;

        let actual = crate::FileEntry::compute_checksum(&data);
        if actual != entry.sha256 {
            return Err(SnapshotError::ChecksumMismatch {
                path: path.to_string(),
                expected: entry.sha256,
                actual,
            });
        }
        debug!(path, bytes = data.len(), "payload verified");
        Ok(data)
    }

    /// Read and decode a verified JSON payload.
    pub fn read_json<T: DeserializeOwned>(&mut self, path: &str) -> Result<T> {
        let data = self.read_verified(path)?;
        Ok(serde_json::from_slice(&data)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnapshotWriter;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        name: String,
        count: u64,
    }

    fn sample_bytes() -> Vec<u8> {
        let mut writer = SnapshotWriter::new("1.0.0", "0.1.0").with_rust_version("1.88");
        writer
            .add_json(
                "database.json",
                &Payload {
                    name: "demo".into(),
                    count: 3,
                },
            )
            .unwrap();
        writer.write_to_bytes().unwrap()
    }

    #[test]
    fn roundtrip_through_bytes() {
        let mut reader = SnapshotReader::from_bytes(sample_bytes()).unwrap();
        reader.expect_schema_version("1.0.0").unwrap();
        let payload: Payload = reader.read_json("database.json").unwrap();
        assert_eq!(
            payload,
            Payload {
                name: "demo".into(),
                count: 3
            }
        );
    }

    #[test]
    fn foreign_schema_version_is_rejected() {
        let reader = SnapshotReader::from_bytes(sample_bytes()).unwrap();
        assert!(matches!(
            reader.expect_schema_version("2.0.0"),
            Err(SnapshotError::SchemaMismatch { .. })
        ));
    }

    #[test]
    fn missing_payload_is_reported() {
        let mut reader = SnapshotReader::from_bytes(sample_bytes()).unwrap();
        assert!(matches!(
            reader.read_json::<Payload>("rules.json"),
            Err(SnapshotError::MissingFile(_))
        ));
    }

    #[test]
    fn tampered_payload_fails_the_checksum() {
        let bytes = sample_bytes();
        // Re-zip with a modified payload but the original manifest.
        let mut reader = SnapshotReader::from_bytes(bytes).unwrap();
        let manifest = reader.manifest().clone();
        let payload = reader.read_verified("database.json").unwrap();

        let mut tampered = Vec::new();
        {
            use std::io::Write;
            use zip::write::{FileOptions, ZipWriter};
            let mut zip = ZipWriter::new(Cursor::new(&mut tampered));
            let options: FileOptions<'_, ()> = FileOptions::default();
            zip.start_file(MANIFEST_FILE_NAME, options).unwrap();
            zip.write_all(manifest.to_json().unwrap().as_bytes()).unwrap();
            zip.start_file("database.json", options).unwrap();
            let mut corrupted = payload.clone();
            corrupted[0] ^= 0xff;
            zip.write_all(&corrupted).unwrap();
            zip.finish().unwrap();
        }

        let mut reader = SnapshotReader::from_bytes(tampered).unwrap();
        assert!(matches!(
            reader.read_verified("database.json"),
            Err(SnapshotError::ChecksumMismatch { .. })
        ));
    }

    #[test]
    fn file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("db.armery");
        let mut writer = SnapshotWriter::new("1.0.0", "0.1.0");
        writer
            .add_json(
                "database.json",
                &Payload {
                    name: "disk".into(),
                    count: 1,
                },
            )
            .unwrap();
        writer.write_to_file(&path).unwrap();

        let mut reader = SnapshotReader::open(&path).unwrap();
        let payload: Payload = reader.read_json("database.json").unwrap();
        assert_eq!(payload.count, 1);
    }
}
