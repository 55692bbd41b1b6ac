//! Configuration loading and platform directory resolution.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Theme applied when the durable store has no persisted choice.
    #[serde(default = "default_theme_name")]
    pub theme: String,

    #[serde(default)]
    pub editor: EditorConfig,
}

fn default_theme_name() -> String {
    "light".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme_name(),
            editor: EditorConfig::default(),
        }
    }
}

/// Editor behavior configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditorConfig {
    #[serde(default = "default_true")]
    pub line_numbers: bool,

    /// Number of spaces inserted for a Tab key press.
    #[serde(default = "default_tab_size")]
    pub tab_size: usize,
}

fn default_true() -> bool {
    true
}

fn default_tab_size() -> usize {
    4
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            line_numbers: true,
            tab_size: default_tab_size(),
        }
    }
}

impl Config {
    pub const FILENAME: &'static str = "config.json";

    /// Load configuration from `path`, falling back to defaults when the
    /// file is missing or fails to parse.
    pub fn load_or_default(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(config) => {
                    tracing::info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    tracing::warn!("Failed to parse {}: {}, using defaults", path.display(), e);
                    Self::default()
                }
            },
            Err(_) => {
                tracing::debug!("No config file at {}, using defaults", path.display());
                Self::default()
            }
        }
    }

    /// Save configuration as pretty-printed JSON.
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ConfigError::Io(format!("{}: {}", parent.display(), e)))?;
        }
        let contents = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Serialize(e.to_string()))?;
        std::fs::write(path, contents)
            .map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Io(String),
    Serialize(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(msg) => write!(f, "config I/O error: {}", msg),
            ConfigError::Serialize(msg) => write!(f, "config serialize error: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Directory paths for editor state and configuration.
///
/// Only `main` constructs this from the system directories; everything else
/// receives it by parameter so tests can point it at temp dirs.
#[derive(Debug, Clone)]
pub struct DirectoryContext {
    /// Data directory for persistent state (document records, logs).
    pub data_dir: PathBuf,

    /// Config directory for user configuration.
    pub config_dir: PathBuf,
}

impl DirectoryContext {
    /// Create a DirectoryContext from the system directories.
    /// This should ONLY be called from main().
    pub fn from_system() -> std::io::Result<Self> {
        let data_dir = dirs::data_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine data directory",
                )
            })?
            .join("alactic");
        let config_dir = dirs::config_dir()
            .ok_or_else(|| {
                std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "Could not determine config directory",
                )
            })?
            .join("alactic");
        Ok(Self {
            data_dir,
            config_dir,
        })
    }

    /// Create a DirectoryContext for testing, rooted in a temp directory.
    pub fn for_testing(temp_dir: &Path) -> Self {
        Self {
            data_dir: temp_dir.join("data"),
            config_dir: temp_dir.join("config"),
        }
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(Config::FILENAME)
    }

    /// Path of the durable key-value store file.
    pub fn records_path(&self) -> PathBuf {
        self.data_dir.join("records.json")
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join("alactic.log")
    }
}
