//! Configuration management for Shoebox.
//!
//! Configuration is loaded from the platform config directory with sensible
//! defaults. Every section is `#[serde(default)]`, so a partial file only
//! overrides what it names.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Shoebox.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// File classification
    pub scan: ScanConfig,

    /// External media tools
    pub tools: ToolsConfig,

    /// Thumbnail generation settings
    pub thumbnail: ThumbnailConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Event channel settings
    pub pipeline: PipelineConfig,

    /// Logging settings
    pub logging: LoggingConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.shoebox.shoebox/config.toml
    /// - Linux: ~/.config/shoebox/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\shoebox\config\config.toml
    ///
    /// Falls back to ~/.shoebox/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "shoebox", "shoebox")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".shoebox").join("config.toml")
            })
    }

    /// Resolved probe executable (with ~ expansion).
    pub fn ffprobe_path(&self) -> PathBuf {
        expand(&self.tools.ffprobe)
    }

    /// Resolved frame extraction executable (with ~ expansion).
    pub fn ffmpeg_path(&self) -> PathBuf {
        expand(&self.tools.ffmpeg)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    let expanded = shellexpand::tilde(&path_str);
    PathBuf::from(expanded.into_owned())
}
