//! CLI commands

pub mod problems;
pub mod request;
pub mod run;
pub mod schema;

use anyhow::{Context, Result};
use sqlcheck_cli::AppConfig;
use sqlcheck_problems::InMemoryProblemRepository;

/// Load problems for a command, with a readable error
pub(crate) fn load_problems(config: &AppConfig) -> Result<InMemoryProblemRepository> {
    sqlcheck_cli::load_problems(config).context("Failed to load problems")
}
