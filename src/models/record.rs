use serde::Serialize;

/// A converted source file as stored in the ledger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProcessedFileRecord {
    /// Absolute source path.
    pub path: String,
    /// Source mtime at conversion, in nanoseconds since the Unix epoch.
    pub last_modified: i64,
    /// When the record was last written (`SQLite` `CURRENT_TIMESTAMP`, UTC).
    pub converted_at: String,
}
