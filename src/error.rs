use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("ledger error: {0}")]
    Ledger(#[from] rusqlite::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("startup error: {detail}")]
    Startup { detail: String },

    #[error("extraction failed for {path}: {detail}")]
    Extraction { path: String, detail: String },

    #[error("ocr failed on page {page} of {path}: {detail}")]
    Ocr {
        path: String,
        page: usize,
        detail: String,
    },

    #[error("docx xml error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("config error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl ConvertError {
    /// Build an extraction failure for `path`.
    pub fn extraction(path: &std::path::Path, detail: impl Into<String>) -> Self {
        Self::Extraction {
            path: path.to_string_lossy().into(),
            detail: detail.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extraction_error_names_path() {
        let err = ConvertError::extraction(std::path::Path::new("/in/bad.pdf"), "corrupt xref");
        assert_eq!(
            err.to_string(),
            "extraction failed for /in/bad.pdf: corrupt xref"
        );
    }

    #[test]
    fn sqlite_errors_convert_to_ledger_variant() {
        let err: ConvertError = rusqlite::Error::InvalidQuery.into();
        assert!(matches!(err, ConvertError::Ledger(_)));
    }
}
