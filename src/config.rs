//! Configuration
//!
//! Options for the rule compiler and the field collection. Every option has a
//! default, so an empty JSON object is a valid configuration.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default length of generated field ids
pub const DEFAULT_ID_LENGTH: usize = 12;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// Returns the error code
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Io(_) => "CONFIG_IO",
            ConfigError::Parse(_) => "CONFIG_PARSE",
            ConfigError::Invalid(_) => "CONFIG_INVALID",
        }
    }
}

/// Rule compiler options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompilerConfig {
    /// Reject JSON text longer than the field's `maxSize` (default: false)
    #[serde(default)]
    pub enforce_json_max_size: bool,

    /// Ignore a leading `www.` when matching URL hosts (default: true)
    #[serde(default = "default_strip_www_prefix")]
    pub strip_www_prefix: bool,
}

fn default_strip_www_prefix() -> bool {
    true
}

impl Default for CompilerConfig {
    fn default() -> Self {
        Self {
            enforce_json_max_size: false,
            strip_www_prefix: default_strip_www_prefix(),
        }
    }
}

/// Field collection options
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollectionConfig {
    /// Length of generated field ids (default: 12)
    #[serde(default = "default_id_length")]
    pub id_length: usize,
}

fn default_id_length() -> usize {
    DEFAULT_ID_LENGTH
}

impl Default for CollectionConfig {
    fn default() -> Self {
        Self {
            id_length: default_id_length(),
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub compiler: CompilerConfig,

    #[serde(default)]
    pub collection: CollectionConfig,
}

impl Config {
    /// Parse configuration from a JSON string
    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: Config = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_json_str(&content)
    }

    fn validate(&self) -> ConfigResult<()> {
        if self.collection.id_length == 0 {
            return Err(ConfigError::Invalid("collection.id_length must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(!config.compiler.enforce_json_max_size);
        assert!(config.compiler.strip_www_prefix);
        assert_eq!(config.collection.id_length, 12);
    }

    #[test]
    fn test_empty_object_gives_defaults() {
        assert_eq!(Config::from_json_str("{}").unwrap(), Config::default());
    }

    #[test]
    fn test_partial_override() {
        let config = Config::from_json_str(r#"{ "compiler": { "enforce_json_max_size": true } }"#).unwrap();
        assert!(config.compiler.enforce_json_max_size);
        assert!(config.compiler.strip_www_prefix);
    }

    #[test]
    fn test_zero_id_length_rejected() {
        let err = Config::from_json_str(r#"{ "collection": { "id_length": 0 } }"#).unwrap_err();
        assert_eq!(err.code(), "CONFIG_INVALID");
    }

    #[test]
    fn test_load_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"{{ "collection": {{ "id_length": 20 }} }}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.collection.id_length, 20);
    }

    #[test]
    fn test_load_errors() {
        let dir = tempfile::tempdir().unwrap();
        let err = Config::load(&dir.path().join("missing.json")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));

        let mut file = NamedTempFile::new().unwrap();
        write!(file, "not json").unwrap();
        let err = Config::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }
}
