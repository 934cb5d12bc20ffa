//! Schema command

use std::process::ExitCode;

use anyhow::Result;
use colored::*;
use sqlcheck_cli::AppConfig;
use sqlcheck_core::VerificationEngine;

use crate::console::CliConsole;

/// Describe the tables of the template database
pub async fn show(config: &AppConfig, json: bool) -> Result<ExitCode> {
    let engine = VerificationEngine::new(config.engine.clone());
    let tables = engine.describe_schema().await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&tables)?);
        return Ok(ExitCode::SUCCESS);
    }

    let console = CliConsole::new(true);
    console.print_header(&format!(
        "Schema of {}",
        config.engine.sandbox.template_path.display()
    ));

    for table in &tables {
        println!();
        println!("{}", table.name.bold());
        for column in &table.columns {
            let mut flags = Vec::new();
            if column.primary_key {
                flags.push("PK");
            }
            if column.not_null {
                flags.push("NOT NULL");
            }
            println!(
                "  {:<24} {:<16} {}",
                column.name,
                column.declared_type,
                flags.join(" ").dimmed()
            );
        }
    }

    Ok(ExitCode::SUCCESS)
}
