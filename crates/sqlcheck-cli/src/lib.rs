//! SQLCheck request boundary and application wiring
//!
//! The `sqlcheck` binary is a thin shell over this library: [`AppConfig`]
//! describes where the template and problems live, and [`SqlService`] turns
//! JSON requests into status codes and JSON bodies.

pub mod api;
pub mod config;

use std::sync::Arc;

use sqlcheck_core::VerificationEngine;
use sqlcheck_problems::{InMemoryProblemRepository, ProblemLoader, ProblemResult};

pub use api::{ApiResponse, CallerGate, OpenGate, SqlRequest, SqlService, TokenGate};
pub use config::{AppConfig, ConfigError};

/// Load the configured problem set, falling back to the built-in problems
pub fn load_problems(config: &AppConfig) -> ProblemResult<InMemoryProblemRepository> {
    let loader = match &config.problems_dir {
        Some(dir) => ProblemLoader::new(dir),
        None => ProblemLoader::builtin(),
    };
    loader.load_repository()
}

/// Build the request service described by `config`
pub fn build_service(config: &AppConfig) -> ProblemResult<SqlService> {
    let problems = load_problems(config)?;
    let gate: Arc<dyn CallerGate> = match &config.auth_token {
        Some(token) => Arc::new(TokenGate::new(token)),
        None => Arc::new(OpenGate),
    };
    tracing::debug!(
        problems = problems.len(),
        authenticated = config.auth_token.is_some(),
        "Built SQL service"
    );
    Ok(SqlService::new(
        VerificationEngine::new(config.engine.clone()),
        Arc::new(problems),
        gate,
    ))
}
