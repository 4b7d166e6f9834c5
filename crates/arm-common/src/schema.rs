//! Database schema versioning.

/// Version of the in-memory database layout as it appears in snapshots.
///
/// Bumped whenever the snapshot payload or the trie encoding changes shape.
/// Snapshot loading and database merging both reject a foreign schema version.
pub const SCHEMA_VERSION: &str = "1.0.0";
