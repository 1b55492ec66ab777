//! Configuration management for Chroma.
//!
//! Configuration is read from a TOML file; every section falls back to the
//! defaults the upload service has always used (150x110 output, depth 120).

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for Chroma.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Artifact and metadata locations
    pub storage: StorageConfig,

    /// Resize and false-color settings
    pub transform: TransformConfig,

    /// HTTP server settings
    pub server: ServerConfig,

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
    /// - macOS: ~/Library/Application Support/com.chroma.chroma/config.toml
    /// - Linux: ~/.config/chroma/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\chroma\config\config.toml
    ///
    /// Falls back to ~/.chroma/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "chroma", "chroma")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".chroma").join("config.toml")
            })
    }

    /// Resolved artifact directory (with ~ expansion).
    pub fn output_dir(&self) -> PathBuf {
        expand(&self.storage.output_dir)
    }

    /// Resolved metadata log path (with ~ expansion).
    pub fn metadata_file(&self) -> PathBuf {
        expand(&self.storage.metadata_file)
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

fn expand(path: &Path) -> PathBuf {
    let path_str = path.to_string_lossy();
    PathBuf::from(shellexpand::tilde(&path_str).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.transform.width, 150);
        assert_eq!(config.transform.height, 110);
        assert_eq!(config.transform.default_depth, 120);
        assert_eq!(
            config.storage.metadata_file,
            PathBuf::from("image_metadata.csv")
        );
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[storage]"));
        assert!(toml.contains("[transform]"));
        assert!(toml.contains("filter = \"catmullrom\""));
    }

    #[test]
    fn test_load_from_partial_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[transform]\nwidth = 64\n\n[server]\nport = 8080\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.transform.width, 64);
        assert_eq!(config.transform.height, 110);
        assert_eq!(config.server.port, 8080);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[transform]\nheight = 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_tilde_expansion() {
        let mut config = Config::default();
        config.storage.output_dir = PathBuf::from("~/chroma-out");
        assert!(!config.output_dir().to_string_lossy().starts_with('~'));
    }
}
