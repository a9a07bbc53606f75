//! TOML configuration for the journal CLI.
//!
//! ```toml
//! data_dir = "/home/me/journal"
//! default_starting_balance = 25000.0
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```

use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use tradejournal_core::domain::DEFAULT_STARTING_BALANCE;

use crate::logging::LoggingConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("default_starting_balance must be positive, got {0}")]
    InvalidBalance(f64),
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct JournalConfig {
    /// Overrides the platform data directory.
    pub data_dir: Option<PathBuf>,
    /// Used when `strategy create` is given no balance.
    pub default_starting_balance: f64,
    pub logging: LoggingConfig,
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            default_starting_balance: DEFAULT_STARTING_BALANCE,
            logging: LoggingConfig::default(),
        }
    }
}

impl JournalConfig {
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        let balance = config.default_starting_balance;
        if !(balance.is_finite() && balance > 0.0) {
            return Err(ConfigError::InvalidBalance(balance));
        }
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Load an explicitly requested file, or fall back to `default_path`
    /// (which may be absent).
    pub fn load(explicit: Option<&Path>, default_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::from_file(path);
        }
        match default_path {
            Some(path) if path.exists() => Self::from_file(path),
            _ => {
                debug!("no config file, using defaults");
                Ok(Self::default())
            }
        }
    }
}
