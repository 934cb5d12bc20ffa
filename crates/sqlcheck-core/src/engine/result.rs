//! Verification result payload

use serde::Serialize;

use crate::error::{SqlErrorKind, StatementError};
use crate::value::{QueryOutput, Row};

/// Response handed back to the request boundary
///
/// `success` reports whether the submission executed; `is_correct` is only
/// present when a reference was compared against, and `expected_data` only
/// when the learner needs to see what was expected.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResult {
    pub success: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub columns: Option<Vec<String>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<SqlErrorKind>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_correct: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_data: Option<Vec<Row>>,
}

impl VerificationResult {
    /// A statement ran with nothing to compare against
    pub fn executed(output: QueryOutput) -> Self {
        Self {
            success: true,
            data: Some(output.rows),
            columns: Some(output.columns),
            ..Default::default()
        }
    }

    /// A submission ran and was compared against the reference output
    pub fn checked(actual: QueryOutput, expected: QueryOutput, is_correct: bool) -> Self {
        Self {
            success: true,
            data: Some(actual.rows),
            columns: Some(actual.columns),
            is_correct: Some(is_correct),
            expected_data: (!is_correct).then_some(expected.rows),
            ..Default::default()
        }
    }

    /// The submission itself failed to run
    pub fn submission_failed(err: &StatementError, expected: Option<Vec<Row>>) -> Self {
        Self {
            success: false,
            error: Some(err.to_string()),
            error_kind: Some(err.kind()),
            expected_data: expected,
            ..Default::default()
        }
    }

    /// Whether the submission failed because it could not be parsed
    pub fn is_syntax_error(&self) -> bool {
        self.error_kind == Some(SqlErrorKind::Syntax)
    }
}
