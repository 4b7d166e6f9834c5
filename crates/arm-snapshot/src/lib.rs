//! Whole-image snapshot container for Armery databases.
//!
//! A snapshot is a ZIP archive whose first entry is `manifest.json`: the
//! package, schema, and toolchain versions that produced the image, a
//! snapshot id, and a SHA-256 checksum per payload file. Payloads are JSON.
//! The container is generic; what goes into `database.json` is decided by the
//! caller. Readers verify checksums and reject foreign schema versions before
//! any payload is decoded.

pub mod error;
pub mod manifest;
pub mod reader;
pub mod writer;

pub use error::{Result, SnapshotError};
pub use manifest::{FileEntry, SnapshotManifest, MANIFEST_FILE_NAME, SNAPSHOT_FORMAT_VERSION};
pub use reader::SnapshotReader;
pub use writer::SnapshotWriter;
