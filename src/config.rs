//! Run configuration
//!
//! Loaded from an explicit TOML file, else `~/.budget-fx/config.toml`, else
//! built-in defaults. Every field is optional in the file.

use crate::error::{FxError, Result};
use crate::fx::{DEFAULT_BASE_CURRENCY, DEFAULT_RATES_BASE_URL, DEFAULT_TIMEOUT_SECS};
use crate::pipeline::PipelineOptions;
use crate::types::DEFAULT_CHUNK_SIZE;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Config {
    #[serde(default = "default_rates_base_url")]
    pub rates_base_url: String,
    #[serde(default = "default_base_currency")]
    pub base_currency: String,
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// 0 disables the timeout
    #[serde(default = "default_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_logs_dir")]
    pub logs_dir: PathBuf,
}

fn default_rates_base_url() -> String {
    DEFAULT_RATES_BASE_URL.to_string()
}

fn default_base_currency() -> String {
    DEFAULT_BASE_CURRENCY.to_string()
}

fn default_chunk_size() -> usize {
    DEFAULT_CHUNK_SIZE
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_logs_dir() -> PathBuf {
    PathBuf::from("logs")
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rates_base_url: default_rates_base_url(),
            base_currency: default_base_currency(),
            chunk_size: default_chunk_size(),
            request_timeout_secs: default_timeout_secs(),
            logs_dir: default_logs_dir(),
        }
    }
}

impl Config {
    /// Default config location in the user's home directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".budget-fx").join("config.toml"))
    }

    /// Load from `path` if given (it must exist), else from the default location
    /// when present, else defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(default) if default.exists() => Self::from_file(&default)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| {
            FxError::ConfigError(format!("Failed to read {}: {}", path.display(), e))
        })?;
        Self::from_toml(&contents)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents)
            .map_err(|e| FxError::ConfigError(format!("Failed to parse config: {}", e)))
    }

    /// Reject values the pipeline cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(FxError::ConfigError(
                "chunk_size must be greater than 0".to_string(),
            ));
        }
        if self.rates_base_url.trim().is_empty() {
            return Err(FxError::ConfigError(
                "rates_base_url must not be empty".to_string(),
            ));
        }
        if self.base_currency.trim().is_empty() {
            return Err(FxError::ConfigError(
                "base_currency must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// HTTP timeout, `None` when disabled
    pub fn request_timeout(&self) -> Option<Duration> {
        (self.request_timeout_secs > 0).then(|| Duration::from_secs(self.request_timeout_secs))
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            chunk_size: self.chunk_size,
        }
    }
}
