use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use crate::error::{ConvertError, Result};
use crate::extract::ocr::OcrEngine;

/// Page-based PDF text extractor with optional OCR for pages that have no
/// text layer.
pub struct PdfExtractor {
    ocr: Option<Box<dyn OcrEngine>>,
}

impl Default for PdfExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfExtractor {
    /// Text layer only; scanned pages come out empty.
    #[must_use]
    pub fn new() -> Self {
        Self { ocr: None }
    }

    #[must_use]
    pub fn with_ocr(ocr: Box<dyn OcrEngine>) -> Self {
        Self { ocr: Some(ocr) }
    }

    /// Extract text from a PDF file path.
    pub fn extract_from_file(&self, path: &Path) -> Result<String> {
        let bytes = std::fs::read(path)?;
        // pdf-extract panics on some malformed inputs
        let pages = panic::catch_unwind(AssertUnwindSafe(|| {
            pdf_extract::extract_text_from_mem_by_pages(&bytes)
        }))
        .map_err(|_| ConvertError::extraction(path, "PDF parser panicked"))?
        .map_err(|e| ConvertError::extraction(path, format!("PDF extraction error: {e}")))?;

        self.assemble_pages(path, pages)
    }

    /// Concatenate page texts in order, with no separator. Pages whose text
    /// layer is blank are replaced by OCR output when an engine is set.
    pub fn assemble_pages(&self, path: &Path, pages: Vec<String>) -> Result<String> {
        let mut text = String::new();
        for (i, page) in pages.into_iter().enumerate() {
            if !page.trim().is_empty() {
                text.push_str(&page);
                continue;
            }
            match &self.ocr {
                Some(ocr) => {
                    tracing::debug!(path = %path.display(), page = i + 1, "no text layer, running OCR");
                    text.push_str(&ocr.recognize_page(path, i + 1)?);
                }
                None => text.push_str(&page),
            }
        }
        Ok(text)
    }
}
