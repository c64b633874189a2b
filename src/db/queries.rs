use rusqlite::{params, OptionalExtension};

use crate::error::Result;
use crate::models::record::ProcessedFileRecord;

use super::LedgerHandle;

impl LedgerHandle {
    /// True iff `path` was recorded with exactly this `last_modified`.
    pub fn is_up_to_date(&self, path: &str, last_modified: i64) -> Result<bool> {
        let stored: Option<i64> = self
            .conn()
            .query_row(
                "SELECT last_modified FROM processed_files WHERE path = ?1",
                params![path],
                |row| row.get(0),
            )
            .optional()?;
        Ok(stored == Some(last_modified))
    }

    /// Insert or replace the record for `path`.
    pub fn record(&self, path: &str, last_modified: i64) -> Result<()> {
        self.conn().execute(
            "INSERT INTO processed_files (path, last_modified) VALUES (?1, ?2)
             ON CONFLICT(path) DO UPDATE SET last_modified=?2, converted_at=CURRENT_TIMESTAMP",
            params![path, last_modified],
        )?;
        Ok(())
    }

    /// Get the record for a path.
    pub fn get_record(&self, path: &str) -> Result<Option<ProcessedFileRecord>> {
        let record = self
            .conn()
            .query_row(
                "SELECT path, last_modified, converted_at FROM processed_files WHERE path = ?1",
                params![path],
                map_record,
            )
            .optional()?;
        Ok(record)
    }

    /// Get all records, ordered by path.
    pub fn all_records(&self) -> Result<Vec<ProcessedFileRecord>> {
        let mut stmt = self.conn().prepare(
            "SELECT path, last_modified, converted_at FROM processed_files ORDER BY path",
        )?;
        let rows = stmt.query_map([], map_record)?;
        let mut records = Vec::new();
        for r in rows {
            records.push(r?);
        }
        Ok(records)
    }

    /// Number of recorded files.
    pub fn count(&self) -> Result<usize> {
        let n: i64 =
            self.conn()
                .query_row("SELECT COUNT(*) FROM processed_files", [], |row| row.get(0))?;
        Ok(n as usize)
    }
}

fn map_record(row: &rusqlite::Row<'_>) -> rusqlite::Result<ProcessedFileRecord> {
    Ok(ProcessedFileRecord {
        path: row.get(0)?,
        last_modified: row.get(1)?,
        converted_at: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
    })
}
