//! Engine configuration
//!
//! The template location is injected here rather than read from a global so
//! that several engines (and tests) can point at different datasets.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Where sandboxes come from and where they are materialized
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SandboxConfig {
    /// Read-only template database copied for every sandbox
    pub template_path: PathBuf,

    /// Directory receiving the per-request copies
    #[serde(default = "default_scratch_dir")]
    pub scratch_dir: PathBuf,

    /// File name prefix for sandbox copies
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_scratch_dir() -> PathBuf {
    std::env::temp_dir().join("sqlcheck")
}

fn default_file_prefix() -> String {
    "sandbox".to_string()
}

impl SandboxConfig {
    /// Create a config for the given template with default scratch settings
    pub fn new(template_path: impl Into<PathBuf>) -> Self {
        Self {
            template_path: template_path.into(),
            scratch_dir: default_scratch_dir(),
            file_prefix: default_file_prefix(),
        }
    }

    /// Set scratch directory
    pub fn with_scratch_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.scratch_dir = dir.into();
        self
    }

    /// Set file prefix
    pub fn with_file_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.file_prefix = prefix.into();
        self
    }
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("data").join("chinook.db"))
    }
}

/// Configuration for the verification engine
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Sandbox provisioning settings
    #[serde(default)]
    pub sandbox: SandboxConfig,

    /// Upper bound on a single statement's running time
    #[serde(default = "default_statement_timeout", with = "humantime_serde")]
    pub statement_timeout: Duration,

    /// Maximum rows materialized from one query
    #[serde(default = "default_max_rows")]
    pub max_rows: usize,
}

fn default_statement_timeout() -> Duration {
    Duration::from_secs(5)
}

fn default_max_rows() -> usize {
    10_000
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sandbox: SandboxConfig::default(),
            statement_timeout: default_statement_timeout(),
            max_rows: default_max_rows(),
        }
    }
}

impl EngineConfig {
    /// Create a config around the given sandbox settings
    pub fn new(sandbox: SandboxConfig) -> Self {
        Self {
            sandbox,
            ..Default::default()
        }
    }

    /// Set statement timeout
    pub fn with_statement_timeout(mut self, timeout: Duration) -> Self {
        self.statement_timeout = timeout;
        self
    }

    /// Set row limit
    pub fn with_max_rows(mut self, max_rows: usize) -> Self {
        self.max_rows = max_rows;
        self
    }
}
