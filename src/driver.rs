//! Runs the pipeline for every file in the input directory on a bounded
//! worker pool.

use std::panic::{self, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ignore::WalkBuilder;
use rayon::prelude::*;

use crate::db::{Ledger, LedgerHandle};
use crate::error::{ConvertError, Result};
use crate::extract::TextExtractor;
use crate::models::task::ConversionTask;
use crate::pipeline::{ConversionPipeline, FailureStage, TaskOutcome};
use crate::report::{Reporter, RunReport};

/// Run-level cancellation. Once cancelled, queued tasks are not started;
/// tasks already running finish normally.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Distributes conversion tasks across a worker pool.
pub struct ConcurrencyDriver<'a> {
    extractor: &'a dyn TextExtractor,
    reporter: &'a dyn Reporter,
    workers: usize,
    cancel: CancelToken,
}

impl<'a> ConcurrencyDriver<'a> {
    pub fn new(extractor: &'a dyn TextExtractor, reporter: &'a dyn Reporter, workers: usize) -> Self {
        Self {
            extractor,
            reporter,
            workers: workers.max(1),
            cancel: CancelToken::new(),
        }
    }

    #[must_use]
    pub fn with_cancel(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Convert every supported file in `input_dir` into `output_dir`.
    ///
    /// Only startup problems (missing input directory, unusable output
    /// directory, pool creation) are returned as errors. Per-file failures
    /// are collected in the report.
    pub fn run(&self, input_dir: &Path, output_dir: &Path, ledger: &Ledger) -> Result<RunReport> {
        let input_dir = input_dir.canonicalize().map_err(|e| ConvertError::Startup {
            detail: format!("input directory {}: {e}", input_dir.display()),
        })?;
        if !input_dir.is_dir() {
            return Err(ConvertError::Startup {
                detail: format!("{} is not a directory", input_dir.display()),
            });
        }
        std::fs::read_dir(&input_dir).map_err(|e| ConvertError::Startup {
            detail: format!("cannot read {}: {e}", input_dir.display()),
        })?;
        std::fs::create_dir_all(output_dir).map_err(|e| ConvertError::Startup {
            detail: format!("output directory {}: {e}", output_dir.display()),
        })?;

        let tasks: Vec<ConversionTask> = list_files(&input_dir, self.reporter)
            .into_iter()
            .map(|path| ConversionTask::new(path, output_dir))
            .collect();

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("doc2txt-worker-{i}"))
            .build()
            .map_err(|e| ConvertError::Startup {
                detail: format!("cannot start worker pool: {e}"),
            })?;

        self.reporter
            .run_started(&input_dir, tasks.len(), self.workers);

        let pipeline = ConversionPipeline::new(self.extractor, self.reporter);
        let outcomes: Vec<TaskOutcome> = pool.install(|| {
            tasks
                .par_iter()
                .map_init(
                    || ledger.acquire(),
                    |handle, task| self.run_task(&pipeline, task, handle),
                )
                .collect()
        });

        let mut report = RunReport {
            scanned: tasks.len(),
            ..RunReport::default()
        };
        for (task, outcome) in tasks.iter().zip(outcomes) {
            report.add(task, outcome);
        }
        self.reporter.run_finished(&report);
        Ok(report)
    }

    fn run_task(
        &self,
        pipeline: &ConversionPipeline<'_>,
        task: &ConversionTask,
        handle: &Result<LedgerHandle>,
    ) -> TaskOutcome {
        if self.cancel.is_cancelled() {
            let outcome = TaskOutcome::Cancelled;
            self.reporter.task_finished(task, &outcome);
            return outcome;
        }
        let handle = match handle {
            Ok(h) => h,
            Err(e) => {
                let outcome = TaskOutcome::Failed {
                    stage: FailureStage::Ledger,
                    error: format!("cannot open ledger: {e}"),
                };
                self.reporter.task_finished(task, &outcome);
                return outcome;
            }
        };
        // A panicking extractor must not take sibling tasks down with it
        panic::catch_unwind(AssertUnwindSafe(|| pipeline.run(task, handle))).unwrap_or_else(
            |payload| {
                let outcome = TaskOutcome::Failed {
                    stage: FailureStage::Panic,
                    error: panic_message(payload.as_ref()),
                };
                self.reporter.task_finished(task, &outcome);
                outcome
            },
        )
    }
}

/// Regular files directly inside `dir`, sorted by path. Subdirectories are
/// not descended into. Entries the walker cannot read are handed to
/// `reporter` and left out.
pub fn list_files(dir: &Path, reporter: &dyn Reporter) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = WalkBuilder::new(dir)
        .standard_filters(false)
        .follow_links(true)
        .max_depth(Some(1))
        .build()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(e) => {
                reporter.entry_unreadable(&e.to_string());
                None
            }
        })
        .filter(|e| e.depth() == 1)
        .filter(|e| e.file_type().is_some_and(|ft| ft.is_file()))
        .map(ignore::DirEntry::into_path)
        .collect();
    files.sort();
    files
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "task panicked".into()
    }
}
