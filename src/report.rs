//! Run and task reporting.
//!
//! The pipeline and driver never log directly; they hand events to a
//! [`Reporter`] supplied by the caller.

use std::path::Path;

use serde::Serialize;

use crate::models::task::ConversionTask;
use crate::pipeline::{FailureStage, TaskOutcome};

/// Receives task and run events.
pub trait Reporter: Send + Sync {
    fn run_started(&self, _input_dir: &Path, _files: usize, _workers: usize) {}

    /// An input directory entry that could not be listed (dangling
    /// symlink, permission denied). It gets no task.
    fn entry_unreadable(&self, _detail: &str) {}

    fn task_finished(&self, task: &ConversionTask, outcome: &TaskOutcome);

    fn run_finished(&self, _report: &RunReport) {}
}

/// Emits events through `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingReporter;

impl Reporter for TracingReporter {
    fn run_started(&self, input_dir: &Path, files: usize, workers: usize) {
        tracing::info!(input = %input_dir.display(), files, workers, "starting conversion run");
    }

    fn entry_unreadable(&self, detail: &str) {
        tracing::warn!(error = %detail, "unreadable input entry, skipped");
    }

    fn task_finished(&self, task: &ConversionTask, outcome: &TaskOutcome) {
        let path = task.source_path.display();
        match outcome {
            TaskOutcome::Converted { output } => {
                tracing::info!(%path, output = %output.display(), "converted");
            }
            TaskOutcome::SkippedUnchanged => tracing::debug!(%path, "unchanged, skipped"),
            TaskOutcome::SkippedUnsupported => tracing::trace!(%path, "unsupported, skipped"),
            TaskOutcome::Cancelled => tracing::debug!(%path, "cancelled before start"),
            TaskOutcome::Failed { stage, error } => {
                tracing::error!(%path, stage = stage.as_str(), %error, "conversion failed");
            }
        }
    }

    fn run_finished(&self, report: &RunReport) {
        tracing::info!(
            converted = report.converted,
            unchanged = report.skipped_unchanged,
            unsupported = report.skipped_unsupported,
            failed = report.failures.len(),
            cancelled = report.cancelled,
            "conversion run finished"
        );
    }
}

/// A file whose conversion failed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailedFile {
    pub path: String,
    pub stage: FailureStage,
    pub error: String,
}

/// Aggregated result of one run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RunReport {
    /// Regular files found in the input directory.
    pub scanned: usize,
    pub converted: usize,
    pub skipped_unchanged: usize,
    pub skipped_unsupported: usize,
    /// Tasks never started because the run was cancelled.
    pub cancelled: usize,
    pub failures: Vec<FailedFile>,
    /// Output files written in this run.
    pub outputs: Vec<String>,
}

impl RunReport {
    pub fn add(&mut self, task: &ConversionTask, outcome: TaskOutcome) {
        match outcome {
            TaskOutcome::Converted { output } => {
                self.converted += 1;
                self.outputs.push(output.to_string_lossy().into_owned());
            }
            TaskOutcome::SkippedUnchanged => self.skipped_unchanged += 1,
            TaskOutcome::SkippedUnsupported => self.skipped_unsupported += 1,
            TaskOutcome::Cancelled => self.cancelled += 1,
            TaskOutcome::Failed { stage, error } => self.failures.push(FailedFile {
                path: task.ledger_key(),
                stage,
                error,
            }),
        }
    }

    #[must_use]
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}
