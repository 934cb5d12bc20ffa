//! Error types for provisioning, statement execution and verification

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Result type alias for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Failure to materialize a sandbox from the template
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("Template database not found: {}", .0.display())]
    TemplateMissing(PathBuf),

    #[error("Failed to prepare scratch directory {}: {source}", .path.display())]
    ScratchDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy template to {}: {source}", .path.display())]
    Copy {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to open sandbox {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    #[error("Sandbox worker failed: {0}")]
    Worker(String),
}

/// Coarse classification of a failed statement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SqlErrorKind {
    /// The statement could not be parsed
    Syntax,
    /// The statement parsed but failed while running
    Execution,
    /// The statement exceeded the per-statement time limit
    Timeout,
}

static SYNTAX_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)(syntax error|incomplete input|unrecognized token)")
        .expect("syntax error pattern is valid")
});

impl SqlErrorKind {
    /// Classify a SQLite error message
    pub fn classify(message: &str) -> Self {
        if SYNTAX_PATTERN.is_match(message) {
            Self::Syntax
        } else {
            Self::Execution
        }
    }
}

/// Failure of a single statement inside a sandbox
#[derive(Debug, Error)]
pub enum StatementError {
    #[error("{message}")]
    Sql { kind: SqlErrorKind, message: String },

    #[error("Statement exceeded the time limit of {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Statement returned more than {0} rows")]
    TooManyRows(usize),

    #[error("Sandbox connection is closed")]
    Closed,

    #[error("Statement worker failed: {0}")]
    Worker(String),
}

impl StatementError {
    /// Classification reported to the learner
    pub fn kind(&self) -> SqlErrorKind {
        match self {
            Self::Sql { kind, .. } => *kind,
            Self::Timeout(_) => SqlErrorKind::Timeout,
            _ => SqlErrorKind::Execution,
        }
    }
}

impl From<rusqlite::Error> for StatementError {
    fn from(err: rusqlite::Error) -> Self {
        let message = match &err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => msg.clone(),
            other => other.to_string(),
        };
        Self::Sql {
            kind: SqlErrorKind::classify(&message),
            message,
        }
    }
}

/// Errors that abort a whole verification request
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Query must not be empty")]
    EmptyQuery,

    #[error("Sandbox provisioning failed: {0}")]
    Provision(#[from] ProvisionError),

    #[error("Reference solution failed: {0}")]
    Reference(#[source] StatementError),

    #[error("Observation query failed on reference sandbox: {0}")]
    Observation(#[source] StatementError),

    #[error("Failed to read template schema: {0}")]
    Schema(#[source] StatementError),

    #[error("Verification task failed: {0}")]
    Join(String),
}

impl EngineError {
    /// Stable code for programmatic handling
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::EmptyQuery => "EMPTY_QUERY",
            Self::Provision(_) => "PROVISION_ERROR",
            Self::Reference(_) => "REFERENCE_ERROR",
            Self::Observation(_) => "OBSERVATION_ERROR",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Join(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP-style status for the request boundary
    pub fn status_code(&self) -> u16 {
        match self {
            Self::EmptyQuery => 400,
            _ => 500,
        }
    }
}

impl From<tokio::task::JoinError> for EngineError {
    fn from(err: tokio::task::JoinError) -> Self {
        Self::Join(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_syntax_errors() {
        assert_eq!(
            SqlErrorKind::classify("near \"SELEKT\": syntax error"),
            SqlErrorKind::Syntax
        );
        assert_eq!(
            SqlErrorKind::classify("incomplete input"),
            SqlErrorKind::Syntax
        );
        assert_eq!(
            SqlErrorKind::classify("no such table: nope"),
            SqlErrorKind::Execution
        );
    }

    #[test]
    fn test_engine_error_codes() {
        assert_eq!(EngineError::EmptyQuery.status_code(), 400);
        assert_eq!(EngineError::EmptyQuery.error_code(), "EMPTY_QUERY");

        let err = EngineError::Reference(StatementError::Closed);
        assert_eq!(err.status_code(), 500);
        assert!(err.to_string().contains("Reference solution failed"));
    }

    #[test]
    fn test_statement_error_kind() {
        let err = StatementError::Timeout(Duration::from_millis(250));
        assert_eq!(err.kind(), SqlErrorKind::Timeout);
        assert!(err.to_string().contains("250ms"));
        assert_eq!(StatementError::TooManyRows(10).kind(), SqlErrorKind::Execution);
    }
}
