//! Command routing logic for CLI

use std::process::ExitCode;

use anyhow::{Context, Result};
use sqlcheck_cli::AppConfig;

use crate::args::{Cli, Commands};
use crate::commands;

/// Route CLI commands to their respective handlers
pub async fn route(cli: Cli) -> Result<ExitCode> {
    let config = load_config(&cli)?;

    match cli.command {
        Commands::Run { sql, json } => commands::run::run(&config, &sql, json).await,
        Commands::Verify { problem, sql, json } => {
            commands::run::verify(&config, &problem, &sql, json).await
        }
        Commands::Problems { difficulty } => {
            commands::problems::list(&config, difficulty.as_deref()).await
        }
        Commands::Problem { id, show_answer } => {
            commands::problems::show(&config, &id, show_answer).await
        }
        Commands::Schema { json } => commands::schema::show(&config, json).await,
        Commands::Request { input, token } => {
            commands::request::handle(&config, &input, token.as_deref()).await
        }
    }
}

/// Layer command-line flags over file and environment settings
fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config_file.as_deref())
        .context("Failed to load configuration")?;

    if let Some(template) = &cli.template {
        config.engine.sandbox.template_path = template.clone();
    }
    if let Some(dir) = &cli.problems_dir {
        config.problems_dir = Some(dir.clone());
    }
    if let Some(timeout) = cli.timeout {
        config.engine.statement_timeout = timeout;
    }

    tracing::debug!(
        template = %config.engine.sandbox.template_path.display(),
        scratch_dir = %config.engine.sandbox.scratch_dir.display(),
        timeout_ms = config.engine.statement_timeout.as_millis() as u64,
        "Configuration resolved"
    );
    Ok(config)
}
