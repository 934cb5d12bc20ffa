//! SQLCheck CLI application
//!
//! Runs and verifies SQL statements against throwaway copies of a template
//! database. Logs go to stderr so stdout carries only results.

mod args;
mod commands;
mod console;
mod router;

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::args::{Cli, LogFormat};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Set RUST_LOG=debug for verbose logging
    init_logging(cli.log_format);

    router::route(cli).await
}

fn init_logging(format: LogFormat) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);

    match format {
        LogFormat::Text => builder.init(),
        LogFormat::Json => builder.json().init(),
    }
}
