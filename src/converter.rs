use crate::config::Config;
use crate::db::Ledger;
use crate::driver::{CancelToken, ConcurrencyDriver};
use crate::error::{ConvertError, Result};
use crate::extract::DocumentExtractor;
use crate::report::{Reporter, RunReport};

/// Run a full conversion with the configured paths, OCR and worker count.
pub fn run_convert(config: &Config, reporter: &dyn Reporter, cancel: CancelToken) -> Result<RunReport> {
    if !config.input_dir.is_dir() {
        return Err(ConvertError::Startup {
            detail: format!("input directory not found: {}", config.input_dir.display()),
        });
    }

    // Schema is created here, before any worker opens its own handle
    let ledger = Ledger::open(&config.ledger_path).map_err(|e| ConvertError::Startup {
        detail: format!("cannot open ledger {}: {e}", config.ledger_path.display()),
    })?;
    let extractor = DocumentExtractor::new(&config.settings.ocr);

    ConcurrencyDriver::new(&extractor, reporter, config.worker_threads())
        .with_cancel(cancel)
        .run(&config.input_dir, &config.output_dir, &ledger)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{write_docx, CollectingReporter};
    use std::fs;
    use tempfile::TempDir;

    fn config(tmp: &TempDir) -> Config {
        let mut cfg = Config::new(tmp.path());
        cfg.settings.ocr.enabled = false;
        cfg.settings.workers.threads = 2;
        cfg
    }

    #[test]
    fn converts_docx_and_skips_other_files() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        fs::create_dir_all(&cfg.input_dir).unwrap();
        write_docx(&cfg.input_dir.join("notes.docx"), &["Intro", "Body", "Conclusion"]);
        fs::write(cfg.input_dir.join("image.png"), [0x89, b'P', b'N', b'G']).unwrap();

        let reporter = CollectingReporter::default();
        let report = run_convert(&cfg, &reporter, CancelToken::new()).unwrap();

        assert_eq!(report.converted, 1);
        assert_eq!(report.skipped_unsupported, 1);
        assert_eq!(
            fs::read_to_string(cfg.output_dir.join("notes.txt")).unwrap(),
            "Intro\nBody\nConclusion\n"
        );
        assert!(!cfg.output_dir.join("image.txt").exists());
        assert!(cfg.ledger_path.exists());
        assert_eq!(reporter.finished_runs(), 1);
    }

    #[test]
    fn corrupt_pdf_is_reported_not_fatal() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        fs::create_dir_all(&cfg.input_dir).unwrap();
        fs::write(cfg.input_dir.join("broken.pdf"), "garbage").unwrap();
        write_docx(&cfg.input_dir.join("ok.docx"), &["fine"]);

        let report = run_convert(&cfg, &CollectingReporter::default(), CancelToken::new()).unwrap();
        assert_eq!(report.converted, 1);
        assert_eq!(report.failures.len(), 1);
        assert!(report.failures[0].path.ends_with("broken.pdf"));
    }

    #[test]
    fn missing_input_fails_before_creating_ledger() {
        let tmp = TempDir::new().unwrap();
        let cfg = config(&tmp);
        let err = run_convert(&cfg, &CollectingReporter::default(), CancelToken::new()).unwrap_err();
        assert!(matches!(err, ConvertError::Startup { .. }));
        assert!(!cfg.ledger_path.exists());
        assert!(!cfg.output_dir.exists());
    }
}
