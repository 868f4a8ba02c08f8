//! Config file loading.
//!
//! Reads a JSON config file from an explicit path or from the platform
//! config directory. A missing default file is not an error.

use crate::config::AppConfig;
use crate::error::CoreError;
use directories::ProjectDirs;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Config file name
const CONFIG_FILE_NAME: &str = "config.json";

/// Config manager
#[derive(Debug, Clone)]
pub struct ConfigManager {
    config: AppConfig,
    /// File the config was read from, if any
    config_path: Option<PathBuf>,
}

impl ConfigManager {
    /// Manager holding an in-memory config
    pub fn new(config: AppConfig) -> Self {
        Self {
            config,
            config_path: None,
        }
    }

    /// Load from `path` if given, else from the default location if that file
    /// exists, else built-in defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, CoreError> {
        match path {
            Some(path) => Self::with_path(path.to_path_buf()),
            None => match Self::default_config_path().filter(|p| p.exists()) {
                Some(path) => Self::with_path(path),
                None => {
                    debug!("no config file, using defaults");
                    Ok(Self::new(AppConfig::default_config()))
                }
            },
        }
    }

    /// Load from an explicit path; the file must exist
    pub fn with_path(config_path: PathBuf) -> Result<Self, CoreError> {
        let config = Self::load_from_file(&config_path)?;
        Ok(Self {
            config,
            config_path: Some(config_path),
        })
    }

    /// Current config
    pub fn get(&self) -> &AppConfig {
        &self.config
    }

    /// Consume the manager and return the config
    pub fn into_config(self) -> AppConfig {
        self.config
    }

    pub fn config_path(&self) -> Option<&Path> {
        self.config_path.as_deref()
    }

    /// Write the current config to `path`
    pub fn save_to(&self, path: &Path) -> Result<(), CoreError> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                CoreError::Config(format!(
                    "failed to create config directory {}: {}",
                    parent.display(),
                    e
                ))
            })?;
        }

        let content = serde_json::to_string_pretty(&self.config)
            .map_err(|e| CoreError::Config(format!("failed to serialize config: {}", e)))?;
        fs::write(path, content).map_err(|e| {
            CoreError::Config(format!("failed to write config file {}: {}", path.display(), e))
        })?;

        debug!("config saved: {}", path.display());
        Ok(())
    }

    /// Platform config directory (e.g. `~/.config/statpush` on Linux)
    pub fn config_dir() -> Option<PathBuf> {
        ProjectDirs::from("org", "statpush", "statpush").map(|p| p.config_dir().to_path_buf())
    }

    fn default_config_path() -> Option<PathBuf> {
        Self::config_dir().map(|dir| dir.join(CONFIG_FILE_NAME))
    }

    fn load_from_file(path: &Path) -> Result<AppConfig, CoreError> {
        let content = fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("failed to read config file {}: {}", path.display(), e))
        })?;

        let config: AppConfig = serde_json::from_str(&content).map_err(|e| {
            CoreError::Config(format!("failed to parse config file {}: {}", path.display(), e))
        })?;

        debug!("config loaded: {}", path.display());
        Ok(config)
    }
}
