//! CLI argument definitions using clap
//!
//! - sqlcheck run "<sql>"                 # Free-run a statement
//! - sqlcheck verify -p <id> "<sql>"      # Check an answer
//! - sqlcheck problems / problem <id>     # Browse problems
//! - sqlcheck schema                      # Show template tables
//! - sqlcheck request [FILE|-]            # JSON request boundary

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "sqlcheck")]
#[command(about = "SQLCheck - verify SQL answers against disposable copies of a practice database")]
#[command(
    long_about = r#"SQLCheck - verify SQL answers against disposable copies of a practice database

USAGE:
  sqlcheck run "SELECT * FROM artists"            # Run a statement
  sqlcheck verify -p basic_001 "SELECT ..."      # Check an answer
  sqlcheck problems --difficulty basic           # List problems
  sqlcheck schema                                # Show template tables
  echo '{"query":"SELECT 1"}' | sqlcheck request # JSON in, JSON out

Every statement runs in its own copy of the template database.
Set RUST_LOG=debug for verbose logging."#
)]
#[command(version)]
pub struct Cli {
    /// Path to configuration file (defaults to ~/.sqlcheck/config.toml)
    #[arg(long, global = true, env = "SQLCHECK_CONFIG")]
    pub config_file: Option<PathBuf>,

    /// Template database copied for every sandbox
    #[arg(long, global = true)]
    pub template: Option<PathBuf>,

    /// Directory of problem files
    #[arg(long, global = true)]
    pub problems_dir: Option<PathBuf>,

    /// Per-statement time limit, e.g. "5s" or "500ms"
    #[arg(long, global = true, value_parser = parse_duration)]
    pub timeout: Option<std::time::Duration>,

    /// Log output format
    #[arg(long, global = true, value_enum, default_value = "text")]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run a statement against a fresh sandbox and print its rows
    Run {
        /// SQL statement
        sql: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Check an answer against a problem's reference solution
    Verify {
        /// Problem id
        #[arg(short, long)]
        problem: String,

        /// Submitted SQL
        sql: String,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List problems
    Problems {
        /// Only show one tier (basic, advanced, extreme)
        #[arg(short, long)]
        difficulty: Option<String>,
    },

    /// Show one problem
    Problem {
        /// Problem id
        id: String,

        /// Also print the reference solution
        #[arg(long)]
        show_answer: bool,
    },

    /// Describe the tables of the template database
    Schema {
        /// Print the schema as JSON
        #[arg(long)]
        json: bool,
    },

    /// Handle a JSON request (`{"query": ..., "problemId": ...}`)
    Request {
        /// Request file, or `-` for stdin
        #[arg(default_value = "-")]
        input: String,

        /// Caller token checked against the configured auth token
        #[arg(long, env = "SQLCHECK_CALLER_TOKEN")]
        token: Option<String>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

fn parse_duration(s: &str) -> Result<std::time::Duration, String> {
    humantime_serde::re::humantime::parse_duration(s).map_err(|e| e.to_string())
}
