//! Per-file conversion: check the ledger, extract, write, record.
//!
//! A task either ends with both the output file written and the ledger
//! record upserted, or with no ledger record for the observed mtime. The
//! output is written to a temporary file in the output directory and renamed
//! into place, so readers never see a partial `.txt`.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::db::LedgerHandle;
use crate::error::{ConvertError, Result};
use crate::extract::TextExtractor;
use crate::models::task::ConversionTask;
use crate::report::Reporter;

/// Step at which a task failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureStage {
    /// Reading the source file's metadata.
    Metadata,
    /// Querying or updating the ledger.
    Ledger,
    Extract,
    /// Writing the output file.
    Write,
    /// The task panicked.
    Panic,
}

impl FailureStage {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Metadata => "metadata",
            Self::Ledger => "ledger",
            Self::Extract => "extract",
            Self::Write => "write",
            Self::Panic => "panic",
        }
    }
}

/// Terminal state of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskOutcome {
    SkippedUnsupported,
    SkippedUnchanged,
    Converted { output: PathBuf },
    Failed { stage: FailureStage, error: String },
    Cancelled,
}

impl TaskOutcome {
    fn failed(stage: FailureStage, error: &ConvertError) -> Self {
        Self::Failed {
            stage,
            error: error.to_string(),
        }
    }
}

/// Runs the conversion sequence for single tasks.
pub struct ConversionPipeline<'a> {
    extractor: &'a dyn TextExtractor,
    reporter: &'a dyn Reporter,
}

impl<'a> ConversionPipeline<'a> {
    pub fn new(extractor: &'a dyn TextExtractor, reporter: &'a dyn Reporter) -> Self {
        Self {
            extractor,
            reporter,
        }
    }

    /// Process one task to a terminal state and report it. Never fails:
    /// errors become [`TaskOutcome::Failed`].
    pub fn run(&self, task: &ConversionTask, ledger: &LedgerHandle) -> TaskOutcome {
        let outcome = self.execute(task, ledger);
        self.reporter.task_finished(task, &outcome);
        outcome
    }

    fn execute(&self, task: &ConversionTask, ledger: &LedgerHandle) -> TaskOutcome {
        // Unsupported files never reach the ledger
        let format = match task.format {
            Some(f) => f,
            None => return TaskOutcome::SkippedUnsupported,
        };

        let key = task.ledger_key();
        let last_modified = match modified_nanos(&task.source_path) {
            Ok(t) => t,
            Err(e) => return TaskOutcome::failed(FailureStage::Metadata, &e),
        };

        match ledger.is_up_to_date(&key, last_modified) {
            Ok(true) => return TaskOutcome::SkippedUnchanged,
            Ok(false) => {}
            Err(e) => return TaskOutcome::failed(FailureStage::Ledger, &e),
        }

        let text = match self.extractor.extract(&task.source_path, format) {
            Ok(text) => text,
            Err(e) => return TaskOutcome::failed(FailureStage::Extract, &e),
        };

        if let Err(e) = write_output(&task.output_path, &text) {
            return TaskOutcome::failed(FailureStage::Write, &e);
        }

        // A failure here leaves the output in place but unrecorded, so the
        // next run converts the file again.
        if let Err(e) = ledger.record(&key, last_modified) {
            return TaskOutcome::failed(FailureStage::Ledger, &e);
        }

        TaskOutcome::Converted {
            output: task.output_path.clone(),
        }
    }
}

/// File mtime in nanoseconds since the Unix epoch (negative before it).
pub fn modified_nanos(path: &Path) -> Result<i64> {
    let modified = std::fs::metadata(path)?.modified()?;
    let nanos = match modified.duration_since(UNIX_EPOCH) {
        Ok(d) => i64::try_from(d.as_nanos()),
        Err(e) => i64::try_from(e.duration().as_nanos()).map(|n| -n),
    };
    nanos.map_err(|_| ConvertError::Other(format!("mtime out of range: {modified:?}")))
}

/// Replace `path` with `text` via a temporary sibling file.
pub fn write_output(path: &Path, text: &str) -> Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(text.as_bytes())?;
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| ConvertError::Io(e.error))?;
    Ok(())
}
