use std::path::Path;
use std::process::Command;

use crate::config::OcrSettings;
use crate::error::{ConvertError, Result};

/// Recognizes the text of a single rendered PDF page.
pub trait OcrEngine: Send + Sync {
    /// `page` is 1-based.
    fn recognize_page(&self, pdf: &Path, page: usize) -> Result<String>;
}

/// OCR through the `pdftoppm` (poppler) and `tesseract` command-line tools.
#[derive(Debug, Clone)]
pub struct TesseractOcr {
    tesseract: String,
    pdftoppm: String,
    language: String,
    dpi: u32,
}

impl TesseractOcr {
    #[must_use]
    pub fn new(settings: &OcrSettings) -> Self {
        Self {
            tesseract: settings.tesseract.clone(),
            pdftoppm: settings.pdftoppm.clone(),
            language: settings.language.clone(),
            dpi: settings.dpi,
        }
    }

    fn fail(pdf: &Path, page: usize, detail: String) -> ConvertError {
        ConvertError::Ocr {
            path: pdf.to_string_lossy().into(),
            page,
            detail,
        }
    }

    fn run(cmd: &mut Command, tool: &str) -> std::result::Result<Vec<u8>, String> {
        let out = cmd
            .output()
            .map_err(|e| format!("cannot run {tool}: {e}"))?;
        if !out.status.success() {
            let stderr = String::from_utf8_lossy(&out.stderr);
            return Err(format!("{tool} exited with {}: {}", out.status, stderr.trim()));
        }
        Ok(out.stdout)
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize_page(&self, pdf: &Path, page: usize) -> Result<String> {
        let scratch = tempfile::TempDir::new()?;
        let prefix = scratch.path().join("page");
        let page_arg = page.to_string();

        Self::run(
            Command::new(&self.pdftoppm)
                .args(["-f", page_arg.as_str(), "-l", page_arg.as_str()])
                .args(["-r", self.dpi.to_string().as_str()])
                .args(["-png", "-singlefile"])
                .arg(pdf)
                .arg(&prefix),
            &self.pdftoppm,
        )
        .map_err(|e| Self::fail(pdf, page, e))?;

        let image = prefix.with_extension("png");
        let stdout = Self::run(
            Command::new(&self.tesseract)
                .arg(&image)
                .arg("stdout")
                .args(["-l", self.language.as_str()]),
            &self.tesseract,
        )
        .map_err(|e| Self::fail(pdf, page, e))?;

        String::from_utf8(stdout)
            .map_err(|e| Self::fail(pdf, page, format!("tesseract produced invalid UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_binary_is_an_ocr_error() {
        let ocr = TesseractOcr::new(&OcrSettings {
            pdftoppm: "doc2txt-no-such-pdftoppm".into(),
            ..OcrSettings::default()
        });
        let err = ocr.recognize_page(Path::new("scan.pdf"), 3).unwrap_err();
        match err {
            ConvertError::Ocr { page, detail, .. } => {
                assert_eq!(page, 3);
                assert!(detail.contains("cannot run doc2txt-no-such-pdftoppm"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn settings_are_copied() {
        let ocr = TesseractOcr::new(&OcrSettings {
            language: "deu".into(),
            dpi: 150,
            ..OcrSettings::default()
        });
        assert_eq!(ocr.language, "deu");
        assert_eq!(ocr.dpi, 150);
        assert_eq!(ocr.tesseract, "tesseract");
    }
}
