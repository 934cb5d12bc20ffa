//! SQLCheck core
//!
//! Verifies a learner's SQL against a reference solution. Both statements run
//! in private copies of a read-only template database, so mutating
//! submissions can never affect the template, the reference, or another
//! request.
//!
//! # Example
//!
//! ```rust,ignore
//! use sqlcheck_core::{EngineConfig, SandboxConfig, VerificationEngine};
//!
//! let engine = VerificationEngine::new(EngineConfig::new(SandboxConfig::new("data/chinook.db")));
//! let result = engine
//!     .verify("SELECT Name FROM artists", "SELECT Name FROM artists ORDER BY Name", None)
//!     .await?;
//! assert_eq!(result.is_correct, Some(true));
//! ```

pub mod compare;
pub mod config;
pub mod engine;
pub mod error;
pub mod executor;
pub mod sandbox;
pub mod schema;
pub mod value;

pub use compare::compare_results;
pub use config::{EngineConfig, SandboxConfig};
pub use engine::{VerificationEngine, VerificationResult, VerifyMode};
pub use error::{EngineError, EngineResult, ProvisionError, SqlErrorKind, StatementError};
pub use executor::StatementExecutor;
pub use sandbox::{DatasetInstance, SandboxProvisioner};
pub use schema::{ColumnInfo, TableInfo};
pub use value::{QueryOutput, Row, Value};
