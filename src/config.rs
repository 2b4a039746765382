//! Storage location and codec settings.

use std::path::{Path, PathBuf};

use crate::codec::DEFAULT_SAMPLE_STEP;
use crate::error::{Error, Result};

const APP_DIR: &str = "drawpad";
const DATABASE_FILE: &str = "drawings.db";
const PAYLOAD_DIR: &str = "drawings";

/// Where drawings live on disk and how paths are sampled when saved.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageConfig {
    /// Root of the application's storage area
    pub root: PathBuf,
    /// SQLite catalog file name, relative to `root`
    pub database_file: String,
    /// Directory holding one JSON payload per drawing, relative to `root`
    pub payload_dir: String,
    /// Arc-length step used when sampling paths into point lists
    pub sample_step: f32,
}

impl StorageConfig {
    /// Storage rooted in the user's data directory:
    /// - Linux: ~/.local/share/drawpad
    /// - macOS: ~/Library/Application Support/drawpad
    /// - Windows: %APPDATA%\drawpad
    pub fn default_location() -> Result<Self> {
        let mut root = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or_else(|| {
                Error::io(
                    APP_DIR,
                    std::io::Error::new(
                        std::io::ErrorKind::NotFound,
                        "could not determine user data directory",
                    ),
                )
            })?;
        root.push(APP_DIR);
        Ok(Self::in_dir(root))
    }

    /// Storage rooted at an explicit directory (tests, portable installs).
    pub fn in_dir(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            database_file: DATABASE_FILE.to_string(),
            payload_dir: PAYLOAD_DIR.to_string(),
            sample_step: DEFAULT_SAMPLE_STEP,
        }
    }

    pub fn database_path(&self) -> PathBuf {
        self.root.join(&self.database_file)
    }

    pub fn payload_path(&self) -> PathBuf {
        self.root.join(&self.payload_dir)
    }

    /// Create the root and payload directories if they are missing.
    pub fn ensure_dirs(&self) -> Result<()> {
        let payloads = self.payload_path();
        std::fs::create_dir_all(&payloads).map_err(|e| Error::io(&payloads, e))
    }

    /// Resolve a record's file reference to a path inside the payload directory.
    pub fn resolve(&self, file_ref: &str) -> PathBuf {
        let name = Path::new(file_ref)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        self.payload_path().join(name)
    }
}
