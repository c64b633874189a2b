use serde::Serialize;

use crate::models::task::Format;

/// Result of listing supported extensions.
#[derive(Debug, Clone, Serialize)]
pub struct SupportedResult {
    pub extensions: Vec<ExtensionInfo>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ExtensionInfo {
    /// The file extension (e.g., ".pdf").
    pub ext: String,
    pub format: Format,
    /// How text is obtained.
    pub extractor: &'static str,
}

#[must_use]
pub fn list_supported() -> SupportedResult {
    let extensions = Format::ALL
        .iter()
        .map(|&format| ExtensionInfo {
            ext: format!(".{}", format.extension()),
            format,
            extractor: match format {
                Format::Pdf => "text layer, OCR fallback per page",
                Format::Docx => "body paragraphs",
            },
        })
        .collect();
    SupportedResult { extensions }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_pdf_and_docx() {
        let result = list_supported();
        let exts: Vec<_> = result.extensions.iter().map(|e| e.ext.as_str()).collect();
        assert_eq!(exts, vec![".pdf", ".docx"]);
        let json = serde_json::to_string(&result).unwrap();
        assert!(json.contains("\"format\":\"docx\""));
    }
}
