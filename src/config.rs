use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{ConvertError, Result};

/// Config filename, looked up in the working directory.
const CONFIG_FILE: &str = "doc2txt.toml";

/// Run configuration resolved against a root directory.
#[derive(Debug, Clone)]
pub struct Config {
    /// Directory relative paths are resolved against.
    pub root: PathBuf,
    /// Directory scanned for documents.
    pub input_dir: PathBuf,
    /// Directory receiving `.txt` files.
    pub output_dir: PathBuf,
    /// Path to the `SQLite` ledger.
    pub ledger_path: PathBuf,
    /// Path to the config file.
    pub config_path: PathBuf,
    /// User settings loaded from doc2txt.toml.
    pub settings: UserSettings,
}

/// User-configurable settings from doc2txt.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct UserSettings {
    /// Input, output and ledger locations.
    pub paths: PathSettings,
    /// Worker pool sizing.
    pub workers: WorkerSettings,
    /// OCR fallback for scanned PDF pages.
    pub ocr: OcrSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PathSettings {
    pub input_dir: String,
    pub output_dir: String,
    pub ledger: String,
}

impl Default for PathSettings {
    fn default() -> Self {
        Self {
            input_dir: "input_folder".into(),
            output_dir: "output_folder".into(),
            ledger: "file_history.db".into(),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkerSettings {
    /// Number of worker threads (0 = available parallelism).
    pub threads: usize,
}

/// OCR settings. Pages are rendered with `pdftoppm` and read by `tesseract`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OcrSettings {
    pub enabled: bool,
    pub tesseract: String,
    pub pdftoppm: String,
    /// Tesseract language code(s), e.g. "eng" or "eng+deu".
    pub language: String,
    /// Render resolution for scanned pages.
    pub dpi: u32,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            tesseract: "tesseract".into(),
            pdftoppm: "pdftoppm".into(),
            language: "eng".into(),
            dpi: 300,
        }
    }
}

impl Config {
    /// Create config rooted at `root`, loading doc2txt.toml from it if present.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let config_path = root.join(CONFIG_FILE);
        let settings = Self::load_settings(&config_path).unwrap_or_default();
        Self::with_settings(root, config_path, settings)
    }

    /// Create config from the current working directory.
    pub fn from_cwd() -> Result<Self> {
        let cwd = std::env::current_dir()
            .map_err(|e| ConvertError::Config(format!("cannot get cwd: {e}")))?;
        Ok(Self::new(cwd))
    }

    /// Create config from an explicit settings file.
    pub fn from_file(root: impl Into<PathBuf>, config_path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(config_path).map_err(|e| {
            ConvertError::Config(format!("cannot read {}: {e}", config_path.display()))
        })?;
        let settings: UserSettings = toml::from_str(&content).map_err(|e| {
            ConvertError::Config(format!("invalid {}: {e}", config_path.display()))
        })?;
        Ok(Self::with_settings(
            root.into(),
            config_path.to_path_buf(),
            settings,
        ))
    }

    fn with_settings(root: PathBuf, config_path: PathBuf, settings: UserSettings) -> Self {
        let input_dir = root.join(&settings.paths.input_dir);
        let output_dir = root.join(&settings.paths.output_dir);
        let ledger_path = root.join(&settings.paths.ledger);
        Self {
            root,
            input_dir,
            output_dir,
            ledger_path,
            config_path,
            settings,
        }
    }

    /// Load settings from doc2txt.toml if it exists.
    fn load_settings(config_path: &Path) -> Option<UserSettings> {
        if !config_path.exists() {
            return None;
        }
        let content = std::fs::read_to_string(config_path).ok()?;
        match toml::from_str(&content) {
            Ok(settings) => Some(settings),
            Err(e) => {
                tracing::warn!(path = %config_path.display(), error = %e, "ignoring invalid config");
                None
            }
        }
    }

    /// Save current settings to doc2txt.toml.
    pub fn save_settings(&self) -> Result<()> {
        let content = toml::to_string_pretty(&self.settings)
            .map_err(|e| ConvertError::Config(format!("failed to serialize settings: {e}")))?;
        std::fs::write(&self.config_path, content)?;
        Ok(())
    }

    pub fn set_input_dir(&mut self, dir: impl AsRef<Path>) {
        self.input_dir = self.root.join(dir);
    }

    pub fn set_output_dir(&mut self, dir: impl AsRef<Path>) {
        self.output_dir = self.root.join(dir);
    }

    pub fn set_ledger_path(&mut self, path: impl AsRef<Path>) {
        self.ledger_path = self.root.join(path);
    }

    /// Effective worker count, resolving 0 to the available parallelism.
    #[must_use]
    pub fn worker_threads(&self) -> usize {
        match self.settings.workers.threads {
            0 => std::thread::available_parallelism().map_or(1, std::num::NonZeroUsize::get),
            n => n,
        }
    }
}
