use std::path::{Path, PathBuf};
use std::time::Duration;

use rusqlite::Connection;

use crate::db::schema::CREATE_SCHEMA;
use crate::error::Result;

/// How long a handle waits on a locked database before failing a write.
const BUSY_TIMEOUT: Duration = Duration::from_secs(30);

/// The conversion ledger: a `SQLite` file shared by all workers.
///
/// `Ledger` itself holds no connection. Each worker calls [`Ledger::acquire`]
/// to get its own [`LedgerHandle`]; concurrent writers are serialized by
/// `SQLite`'s locking.
#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    /// Open (or create) the ledger at `path` and apply the schema.
    ///
    /// Call once per run, before any worker acquires a handle.
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Self::connect(path)?;
        conn.execute_batch("PRAGMA journal_mode=WAL;")?;
        conn.execute_batch(CREATE_SCHEMA)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    /// Open a new connection for the calling worker. The connection is
    /// closed when the handle is dropped.
    pub fn acquire(&self) -> Result<LedgerHandle> {
        let conn = Self::connect(&self.path)?;
        Ok(LedgerHandle { conn })
    }

    fn connect(path: &Path) -> Result<Connection> {
        let conn = Connection::open(path)?;
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch("PRAGMA synchronous=NORMAL;")?;
        Ok(conn)
    }
}

/// A single worker's connection to the ledger.
pub struct LedgerHandle {
    conn: Connection,
}

impl LedgerHandle {
    /// Access the underlying connection.
    pub fn conn(&self) -> &Connection {
        &self.conn
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn open_creates_file_and_table() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file_history.db");
        let ledger = Ledger::open(&path).unwrap();
        assert!(path.exists());

        let handle = ledger.acquire().unwrap();
        let count: i64 = handle
            .conn()
            .query_row("SELECT COUNT(*) FROM processed_files", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn reopen_keeps_existing_records() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("file_history.db");
        Ledger::open(&path)
            .unwrap()
            .acquire()
            .unwrap()
            .record("/in/a.pdf", 42)
            .unwrap();

        let handle = Ledger::open(&path).unwrap().acquire().unwrap();
        assert!(handle.is_up_to_date("/in/a.pdf", 42).unwrap());
    }

    #[test]
    fn handles_are_independent_connections() {
        let tmp = TempDir::new().unwrap();
        let ledger = Ledger::open(&tmp.path().join("l.db")).unwrap();
        let a = ledger.acquire().unwrap();
        let b = ledger.acquire().unwrap();
        a.record("/in/x.docx", 1).unwrap();
        assert!(b.is_up_to_date("/in/x.docx", 1).unwrap());
    }

    #[test]
    fn open_fails_for_missing_parent_dir() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("missing").join("l.db");
        assert!(Ledger::open(&path).is_err());
    }
}
