//! SQLCheck
//!
//! Answer verification for SQL practice problems. A submission and the
//! problem's reference solution each run in a disposable copy of a template
//! SQLite database, and their results are compared order-insensitively.
//!
//! - the engine types, re-exported at the top level
//! - [`problems`]: problem definitions and repositories
//! - [`cli`]: configuration and the JSON request boundary

pub use sqlcheck_cli as cli;
pub use sqlcheck_problems as problems;

pub use sqlcheck_cli::{ApiResponse, AppConfig, SqlRequest, SqlService};
pub use sqlcheck_core::{
    DatasetInstance, EngineConfig, EngineError, Row, SandboxConfig, SandboxProvisioner,
    SqlErrorKind, Value, VerificationEngine, VerificationResult, compare_results,
};
pub use sqlcheck_problems::{Difficulty, Problem, ProblemLoader, ProblemRepository};
