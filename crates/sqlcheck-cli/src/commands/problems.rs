//! Problem browsing commands

use std::process::ExitCode;

use anyhow::{Result, anyhow};
use colored::*;
use sqlcheck_cli::AppConfig;
use sqlcheck_problems::{Difficulty, ProblemRepository};

use crate::console::CliConsole;

/// List available problems
pub async fn list(config: &AppConfig, difficulty: Option<&str>) -> Result<ExitCode> {
    let repo = super::load_problems(config)?;

    let problems = match difficulty {
        Some(d) => {
            let tier: Difficulty = d.parse().map_err(|e: String| anyhow!(e))?;
            repo.list_by_difficulty(tier).await
        }
        None => repo.list().await,
    };

    let console = CliConsole::new(true);
    if problems.is_empty() {
        console.warn("No problems found.");
        return Ok(ExitCode::SUCCESS);
    }

    console.print_header("Problems");
    println!("{:<16} {:<10} {:<9} {}", "ID", "Difficulty", "Kind", "Title");
    println!("{:-<70}", "");

    for problem in &problems {
        // Pad before coloring; escape codes would count towards the width
        let tier = format!("{:<10}", problem.difficulty.display_name());
        let tier = match problem.difficulty {
            Difficulty::Basic => tier.green(),
            Difficulty::Advanced => tier.yellow(),
            Difficulty::Extreme => tier.red(),
        };
        let kind = if problem.is_mutation() { "mutation" } else { "query" };
        println!(
            "{:<16} {} {} {}",
            problem.id,
            tier,
            format!("{:<9}", kind).dimmed(),
            problem.title
        );
    }

    println!("\nTotal: {} problems", problems.len());
    Ok(ExitCode::SUCCESS)
}

/// Show one problem
pub async fn show(config: &AppConfig, id: &str, show_answer: bool) -> Result<ExitCode> {
    let repo = super::load_problems(config)?;
    let problem = repo
        .get(id)
        .await
        .ok_or_else(|| anyhow!("Problem not found: {}", id))?;

    let console = CliConsole::new(true);
    console.print_header(&format!("{} ({})", problem.title, problem.id));
    println!("{} {}", "Difficulty:".bold(), problem.difficulty);
    if !problem.tags.is_empty() {
        println!("{} {}", "Tags:".bold(), problem.tags.join(", "));
    }
    println!();
    println!("{}", problem.description.trim());

    if show_answer {
        println!();
        println!("{}", "Reference solution:".bold());
        println!("{}", problem.example_answer.trim().cyan());
        if let Some(observation) = &problem.verification_query {
            println!("{}", "Checked with:".bold());
            println!("{}", observation.trim().cyan());
        }
    }

    Ok(ExitCode::SUCCESS)
}
