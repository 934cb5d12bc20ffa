//! Application configuration
//!
//! Settings are layered: an optional TOML file, then `SQLCHECK_*` environment
//! variables, then command-line flags (applied by the router).

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use sqlcheck_core::EngineConfig;
use thiserror::Error;

/// Default configuration file name, looked up under `~/.sqlcheck/`
pub const DEFAULT_CONFIG_FILE: &str = "config.toml";

pub const ENV_TEMPLATE: &str = "SQLCHECK_TEMPLATE";
pub const ENV_SCRATCH_DIR: &str = "SQLCHECK_SCRATCH_DIR";
pub const ENV_PROBLEMS_DIR: &str = "SQLCHECK_PROBLEMS_DIR";
pub const ENV_TIMEOUT: &str = "SQLCHECK_TIMEOUT";
pub const ENV_AUTH_TOKEN: &str = "SQLCHECK_AUTH_TOKEN";

/// Configuration loading errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config file {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("Invalid value for {var}: {message}")]
    InvalidEnv { var: &'static str, message: String },
}

/// Settings for the `sqlcheck` binary
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub engine: EngineConfig,

    /// Problem directory; the built-in set is used when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problems_dir: Option<PathBuf>,

    /// Token callers must present; the service is open when unset
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_token: Option<String>,
}

impl AppConfig {
    /// Default config file location (`~/.sqlcheck/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".sqlcheck").join(DEFAULT_CONFIG_FILE))
    }

    /// Load the file (explicit path or default location) and apply the environment
    ///
    /// An explicit path must exist; a missing default file means defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.is_file()) {
                Some(default) => Self::from_file(&default)?,
                None => Self::default(),
            },
        };
        config.apply_env(|var| std::env::var(var).ok())?;
        Ok(config)
    }

    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "Loaded configuration file");
        Ok(config)
    }

    /// Override settings from environment lookups
    pub fn apply_env<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |var: &str| lookup(var).filter(|v| !v.trim().is_empty());

        if let Some(template) = get(ENV_TEMPLATE) {
            self.engine.sandbox.template_path = PathBuf::from(template);
        }
        if let Some(scratch) = get(ENV_SCRATCH_DIR) {
            self.engine.sandbox.scratch_dir = PathBuf::from(scratch);
        }
        if let Some(dir) = get(ENV_PROBLEMS_DIR) {
            self.problems_dir = Some(PathBuf::from(dir));
        }
        if let Some(timeout) = get(ENV_TIMEOUT) {
            self.engine.statement_timeout = humantime_serde::re::humantime::parse_duration(timeout.trim())
                .map_err(|e| ConfigError::InvalidEnv {
                    var: ENV_TIMEOUT,
                    message: e.to_string(),
                })?;
        }
        if let Some(token) = get(ENV_AUTH_TOKEN) {
            self.auth_token = Some(token);
        }
        Ok(())
    }
}
