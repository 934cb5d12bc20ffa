//! Run and verify commands

use std::process::ExitCode;

use anyhow::{Result, anyhow};
use sqlcheck_cli::AppConfig;
use sqlcheck_core::{VerificationEngine, VerificationResult};
use sqlcheck_problems::ProblemRepository;

use crate::console::CliConsole;

/// Run a statement against a fresh sandbox
pub async fn run(config: &AppConfig, sql: &str, json: bool) -> Result<ExitCode> {
    let engine = VerificationEngine::new(config.engine.clone());
    let result = engine.execute(sql).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        print_result(&CliConsole::new(true), &result);
    }

    Ok(exit_code(result.success))
}

/// Verify an answer against a problem's reference solution
pub async fn verify(config: &AppConfig, problem_id: &str, sql: &str, json: bool) -> Result<ExitCode> {
    let problems = super::load_problems(config)?;
    let problem = problems
        .get(problem_id)
        .await
        .ok_or_else(|| anyhow!("Problem not found: {}", problem_id))?;

    let engine = VerificationEngine::new(config.engine.clone());
    let result = engine
        .verify(sql, &problem.example_answer, problem.verification_query.as_deref())
        .await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        let console = CliConsole::new(true);
        console.print_header(&format!("{} ({})", problem.title, problem.id));
        print_result(&console, &result);
    }

    Ok(exit_code(result.is_correct == Some(true)))
}

fn print_result(console: &CliConsole, result: &VerificationResult) {
    if !result.success {
        let kind = result
            .error_kind
            .map(|k| format!("{:?} error", k))
            .unwrap_or_else(|| "Error".to_string());
        console.error(&format!(
            "{}: {}",
            kind,
            result.error.as_deref().unwrap_or("unknown error")
        ));
    } else if let (Some(columns), Some(rows)) = (&result.columns, &result.data) {
        console.print_rows(columns, rows);
    }

    match result.is_correct {
        Some(true) => console.success("Correct!"),
        Some(false) => console.warn("Incorrect: result does not match the expected output"),
        None => {}
    }

    if let Some(expected) = &result.expected_data {
        let columns: Vec<String> = expected
            .first()
            .map(|row| row.columns().map(str::to_string).collect())
            .unwrap_or_default();
        console.print_header("Expected");
        console.print_rows(&columns, expected);
    }
}

fn exit_code(ok: bool) -> ExitCode {
    if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE }
}
