//! Request boundary
//!
//! Turns a JSON SQL request into a status code and a JSON body. Transport is
//! left to the caller; the `request` subcommand feeds it from a file or stdin.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value as JsonValue, json};
use sqlcheck_core::{EngineError, VerificationEngine, VerificationResult};
use sqlcheck_problems::ProblemRepository;

/// Incoming SQL request
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlRequest {
    /// Statement to run or verify
    #[serde(default)]
    pub query: String,

    /// Problem to verify against; free-run when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub problem_id: Option<String>,
}

impl SqlRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            problem_id: None,
        }
    }

    pub fn for_problem(mut self, problem_id: impl Into<String>) -> Self {
        self.problem_id = Some(problem_id.into());
        self
    }
}

/// Status code plus JSON body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse {
    pub status: u16,
    pub body: JsonValue,
}

impl ApiResponse {
    fn ok(body: JsonValue) -> Self {
        Self { status: 200, body }
    }

    fn error(status: u16, code: &str, message: impl Into<String>) -> Self {
        Self {
            status,
            body: json!({
                "success": false,
                "error": message.into(),
                "code": code,
            }),
        }
    }

    /// Whether the status is 2xx
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Decides whether a caller may use the service
pub trait CallerGate: Send + Sync {
    fn authorize(&self, token: Option<&str>) -> bool;
}

/// Lets every caller through
#[derive(Debug, Clone, Copy, Default)]
pub struct OpenGate;

impl CallerGate for OpenGate {
    fn authorize(&self, _token: Option<&str>) -> bool {
        true
    }
}

/// Requires one static bearer token
#[derive(Debug, Clone)]
pub struct TokenGate {
    token: String,
}

impl TokenGate {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

impl CallerGate for TokenGate {
    fn authorize(&self, token: Option<&str>) -> bool {
        token.is_some_and(|t| t == self.token)
    }
}

/// Serves SQL requests against one engine and problem set
#[derive(Clone)]
pub struct SqlService {
    engine: VerificationEngine,
    problems: Arc<dyn ProblemRepository>,
    gate: Arc<dyn CallerGate>,
}

impl SqlService {
    pub fn new(
        engine: VerificationEngine,
        problems: Arc<dyn ProblemRepository>,
        gate: Arc<dyn CallerGate>,
    ) -> Self {
        Self {
            engine,
            problems,
            gate,
        }
    }

    pub fn engine(&self) -> &VerificationEngine {
        &self.engine
    }

    pub fn problems(&self) -> &Arc<dyn ProblemRepository> {
        &self.problems
    }

    /// Handle a raw JSON request body
    pub async fn handle_json(&self, raw: &str, token: Option<&str>) -> ApiResponse {
        match serde_json::from_str::<SqlRequest>(raw) {
            Ok(request) => self.handle(request, token).await,
            Err(e) => {
                if !self.gate.authorize(token) {
                    return Self::unauthorized();
                }
                ApiResponse::error(400, "INVALID_REQUEST", format!("Invalid request body: {}", e))
            }
        }
    }

    /// Handle one request
    pub async fn handle(&self, request: SqlRequest, token: Option<&str>) -> ApiResponse {
        if !self.gate.authorize(token) {
            return Self::unauthorized();
        }

        if request.query.trim().is_empty() {
            return ApiResponse::error(400, EngineError::EmptyQuery.error_code(), "No SQL query provided");
        }

        let outcome = match request.problem_id.as_deref().filter(|id| !id.is_empty()) {
            Some(problem_id) => {
                let Some(problem) = self.problems.get(problem_id).await else {
                    tracing::debug!(problem_id, "Unknown problem");
                    return ApiResponse::error(
                        404,
                        "PROBLEM_NOT_FOUND",
                        format!("Problem not found: {}", problem_id),
                    );
                };
                tracing::debug!(problem_id, mutation = problem.is_mutation(), "Verifying submission");
                self.engine
                    .verify(
                        &request.query,
                        &problem.example_answer,
                        problem.verification_query.as_deref(),
                    )
                    .await
            }
            None => self.engine.execute(&request.query).await,
        };

        match outcome {
            Ok(result) => Self::from_result(&result),
            Err(e) => {
                tracing::error!(code = e.error_code(), error = %e, "Request failed");
                ApiResponse::error(e.status_code(), e.error_code(), e.to_string())
            }
        }
    }

    fn from_result(result: &VerificationResult) -> ApiResponse {
        match serde_json::to_value(result) {
            Ok(body) if result.is_syntax_error() => ApiResponse { status: 400, body },
            Ok(body) => ApiResponse::ok(body),
            Err(e) => ApiResponse::error(500, "SERIALIZATION_ERROR", e.to_string()),
        }
    }

    fn unauthorized() -> ApiResponse {
        ApiResponse::error(401, "UNAUTHORIZED", "Authentication required")
    }
}
