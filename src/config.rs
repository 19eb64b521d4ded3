//! # Configuration
//!
//! Loads optional settings from a `fishly.toml` file. Every field has a
//! default, so a partial file (or no file at all) is valid. Command-line flags
//! take precedence over anything read here.

use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info};

use crate::timeline::DEFAULT_TIMELINE_LIMIT;

/// Config file read when `--config` is not given
pub const DEFAULT_CONFIG_PATH: &str = "fishly.toml";

/// Error types for config loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Application configuration loaded from fishly.toml
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Forecast location settings
    pub location: LocationConfig,
    /// Timeline display settings
    pub timeline: TimelineConfig,
}

/// Forecast location settings
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LocationConfig {
    /// IANA zone used when a payload carries no `tz_id`, e.g. "America/New_York"
    pub timezone: Option<String>,
}

/// Timeline display settings
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct TimelineConfig {
    /// Maximum number of timeline entries
    pub limit: usize,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            limit: DEFAULT_TIMELINE_LIMIT,
        }
    }
}

impl Config {
    /// Load configuration from the specified path
    ///
    /// A missing file yields the defaults. A file that exists but can't be
    /// read or parsed is an error.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(e.into()),
        };

        let config: Config = toml::from_str(&contents)?;
        info!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }
}
