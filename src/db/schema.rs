/// SQL statements for creating the conversion ledger.
///
/// `last_modified` holds the source mtime in nanoseconds since the Unix epoch.
pub const CREATE_SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS processed_files (
    path TEXT PRIMARY KEY NOT NULL,
    last_modified INTEGER NOT NULL,
    converted_at TEXT DEFAULT CURRENT_TIMESTAMP
);
";
