pub mod docx;
pub mod ocr;
pub mod pdf;

use std::path::Path;

use crate::config::OcrSettings;
use crate::error::Result;
use crate::models::task::Format;

use self::docx::DocxExtractor;
use self::ocr::TesseractOcr;
use self::pdf::PdfExtractor;

/// Turns a document into plain text.
pub trait TextExtractor: Send + Sync {
    fn extract(&self, path: &Path, format: Format) -> Result<String>;
}

/// Routes documents to the extractor for their format.
pub struct DocumentExtractor {
    pdf: PdfExtractor,
    docx: DocxExtractor,
}

impl DocumentExtractor {
    /// Build the extractors, wiring OCR fallback when it is enabled.
    #[must_use]
    pub fn new(ocr: &OcrSettings) -> Self {
        let pdf = if ocr.enabled {
            PdfExtractor::with_ocr(Box::new(TesseractOcr::new(ocr)))
        } else {
            PdfExtractor::new()
        };
        Self {
            pdf,
            docx: DocxExtractor::new(),
        }
    }
}

impl TextExtractor for DocumentExtractor {
    fn extract(&self, path: &Path, format: Format) -> Result<String> {
        match format {
            Format::Pdf => self.pdf.extract_from_file(path),
            Format::Docx => self.docx.extract_from_file(path),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ConvertError;
    use tempfile::TempDir;

    #[test]
    fn routes_docx_to_word_extractor() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("notes.docx");
        crate::test_utils::write_docx(&path, &["Intro", "Body"]);

        let extractor = DocumentExtractor::new(&OcrSettings::default());
        let text = extractor.extract(&path, Format::Docx).unwrap();
        assert_eq!(text, "Intro\nBody\n");
    }

    #[test]
    fn corrupt_pdf_is_an_extraction_error() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.4 this is not really a pdf").unwrap();

        let extractor = DocumentExtractor::new(&OcrSettings {
            enabled: false,
            ..OcrSettings::default()
        });
        let err = extractor.extract(&path, Format::Pdf).unwrap_err();
        assert!(matches!(err, ConvertError::Extraction { .. }));
    }
}
