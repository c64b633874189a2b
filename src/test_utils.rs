//! Shared fixtures for unit tests.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use zip::write::SimpleFileOptions;

use crate::error::{ConvertError, Result};
use crate::extract::TextExtractor;
use crate::models::task::{ConversionTask, Format};
use crate::pipeline::TaskOutcome;
use crate::report::{Reporter, RunReport};

/// Escape text for inclusion in a WordprocessingML `<w:t>` element.
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// Build a `word/document.xml` body with one paragraph per entry.
pub fn document_xml(paragraphs: &[&str]) -> String {
    let mut body = String::new();
    for p in paragraphs {
        body.push_str(&format!(
            "<w:p><w:r><w:t xml:space=\"preserve\">{}</w:t></w:r></w:p>",
            escape(p)
        ));
    }
    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
         <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
         <w:body>{body}<w:sectPr/></w:body></w:document>"
    )
}

/// Write a minimal `.docx` containing the given raw document.xml.
pub fn write_docx_xml(path: &Path, xml: &str) {
    let file = std::fs::File::create(path).unwrap();
    let mut zip = zip::ZipWriter::new(file);
    let options = SimpleFileOptions::default();
    zip.start_file("[Content_Types].xml", options).unwrap();
    zip.write_all(
        b"<?xml version=\"1.0\" encoding=\"UTF-8\"?>\
          <Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>",
    )
    .unwrap();
    zip.start_file("word/document.xml", options).unwrap();
    zip.write_all(xml.as_bytes()).unwrap();
    zip.finish().unwrap();
}

/// Write a minimal `.docx` with one paragraph per entry.
pub fn write_docx(path: &Path, paragraphs: &[&str]) {
    write_docx_xml(path, &document_xml(paragraphs));
}

/// Set a file's mtime to `secs` after the Unix epoch.
pub fn set_mtime(path: &Path, secs: u64) {
    let time = std::time::SystemTime::UNIX_EPOCH + std::time::Duration::from_secs(secs);
    std::fs::File::options()
        .write(true)
        .open(path)
        .unwrap()
        .set_modified(time)
        .unwrap();
}

/// Extractor that reads the file as UTF-8, drops `|` page markers and fails
/// on any file containing `FAIL`.
#[derive(Default)]
pub struct FakeExtractor {
    calls: Mutex<Vec<PathBuf>>,
}

impl FakeExtractor {
    pub fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn called_with(&self, name: &str) -> bool {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .any(|p| p.file_name().is_some_and(|n| n == name))
    }
}

impl TextExtractor for FakeExtractor {
    fn extract(&self, path: &Path, _format: Format) -> Result<String> {
        self.calls.lock().unwrap().push(path.to_path_buf());
        let content = std::fs::read_to_string(path)?;
        if content.contains("FAIL") {
            return Err(ConvertError::extraction(path, "simulated corrupt document"));
        }
        Ok(content.replace('|', ""))
    }
}

/// Reporter that keeps every task outcome.
#[derive(Default)]
pub struct CollectingReporter {
    outcomes: Mutex<Vec<(PathBuf, TaskOutcome)>>,
    unreadable: Mutex<Vec<String>>,
    runs: Mutex<Vec<RunReport>>,
}

impl CollectingReporter {
    pub fn outcomes(&self) -> Vec<(PathBuf, TaskOutcome)> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn unreadable(&self) -> Vec<String> {
        self.unreadable.lock().unwrap().clone()
    }

    pub fn finished_runs(&self) -> usize {
        self.runs.lock().unwrap().len()
    }
}

impl Reporter for CollectingReporter {
    fn entry_unreadable(&self, detail: &str) {
        self.unreadable.lock().unwrap().push(detail.to_string());
    }

    fn task_finished(&self, task: &ConversionTask, outcome: &TaskOutcome) {
        self.outcomes
            .lock()
            .unwrap()
            .push((task.source_path.clone(), outcome.clone()));
    }

    fn run_finished(&self, report: &RunReport) {
        self.runs.lock().unwrap().push(report.clone());
    }
}
