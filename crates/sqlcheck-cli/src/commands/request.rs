//! JSON request command
//!
//! Reads one request body, prints the response body to stdout and reports
//! the status through the exit code.

use std::process::ExitCode;

use anyhow::{Context, Result};
use sqlcheck_cli::AppConfig;
use tokio::io::AsyncReadExt;

/// Handle a request read from `input` (a path or `-` for stdin)
pub async fn handle(config: &AppConfig, input: &str, token: Option<&str>) -> Result<ExitCode> {
    let raw = if input == "-" {
        let mut buf = String::new();
        tokio::io::stdin()
            .read_to_string(&mut buf)
            .await
            .context("Failed to read request from stdin")?;
        buf
    } else {
        tokio::fs::read_to_string(input)
            .await
            .with_context(|| format!("Failed to read request file {}", input))?
    };

    let service = sqlcheck_cli::build_service(config).context("Failed to load problems")?;
    let response = service.handle_json(&raw, token).await;

    tracing::info!(status = response.status, "Handled request");
    println!("{}", serde_json::to_string_pretty(&response.body)?);

    Ok(if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
