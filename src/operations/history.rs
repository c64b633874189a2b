use serde::Serialize;

use crate::db::Ledger;
use crate::error::Result;
use crate::models::record::ProcessedFileRecord;

/// Ledger contents, optionally filtered by path.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryResult {
    pub total: usize,
    pub records: Vec<ProcessedFileRecord>,
}

/// List ledger records whose path contains `filter` (all when `None`).
pub fn list_history(ledger: &Ledger, filter: Option<&str>) -> Result<HistoryResult> {
    let handle = ledger.acquire()?;
    let total = handle.count()?;
    let records = handle
        .all_records()?
        .into_iter()
        .filter(|r| filter.map_or(true, |f| r.path.contains(f)))
        .collect();
    Ok(HistoryResult { total, records })
}
