use std::path::{Path, PathBuf};

use serde::Serialize;

/// Document formats the converter can extract text from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Pdf,
    Docx,
}

impl Format {
    pub const ALL: [Format; 2] = [Format::Pdf, Format::Docx];

    /// Map a file extension (without dot, any case) to a format.
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "docx" => Some(Self::Docx),
            _ => None,
        }
    }

    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|e| e.to_str())
            .and_then(Self::from_extension)
    }

    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Pdf => "pdf",
            Self::Docx => "docx",
        }
    }
}

/// One file's conversion attempt within a run.
#[derive(Debug, Clone)]
pub struct ConversionTask {
    pub source_path: PathBuf,
    /// `None` when the extension is not supported.
    pub format: Option<Format>,
    /// `<output_root>/<source stem>.txt`
    pub output_path: PathBuf,
}

impl ConversionTask {
    #[must_use]
    pub fn new(source_path: PathBuf, output_root: &Path) -> Self {
        let format = Format::from_path(&source_path);
        let mut name = source_path
            .file_stem()
            .unwrap_or(source_path.as_os_str())
            .to_os_string();
        name.push(".txt");
        let output_path = output_root.join(name);
        Self {
            source_path,
            format,
            output_path,
        }
    }

    /// Ledger key for the source file.
    #[must_use]
    pub fn ledger_key(&self) -> String {
        self.source_path.to_string_lossy().into_owned()
    }
}
