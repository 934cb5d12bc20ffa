//! Verification engine
//!
//! Runs a submission and a reference solution in two independent sandboxes
//! and decides whether their results are equivalent.
//!
//! Two modes exist:
//!
//! - **Read mode** (no observation query): both statements are queries and
//!   their own rows are compared.
//! - **Mutation mode**: both statements are run as commands, then the same
//!   observation query is run in each sandbox and its rows are compared.

mod result;

pub use result::VerificationResult;

use crate::compare::compare_results;
use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult, StatementError};
use crate::executor::StatementExecutor;
use crate::sandbox::{DatasetInstance, SandboxProvisioner};
use crate::schema::{self, TableInfo};
use crate::value::QueryOutput;

/// How a submission is checked
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerifyMode {
    Read,
    Mutation,
}

impl VerifyMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            VerifyMode::Read => "read",
            VerifyMode::Mutation => "mutation",
        }
    }
}

/// Where a side failed
enum SideFailure {
    Statement(StatementError),
    Observation(StatementError),
}

impl SideFailure {
    fn into_statement_error(self) -> StatementError {
        match self {
            SideFailure::Statement(e) | SideFailure::Observation(e) => e,
        }
    }
}

/// Checks submissions against reference solutions
#[derive(Debug, Clone)]
pub struct VerificationEngine {
    provisioner: SandboxProvisioner,
    executor: StatementExecutor,
}

impl VerificationEngine {
    /// Create an engine from configuration
    pub fn new(config: EngineConfig) -> Self {
        let executor = StatementExecutor::from_config(&config);
        Self {
            provisioner: SandboxProvisioner::new(config.sandbox),
            executor,
        }
    }

    /// Get the sandbox provisioner
    pub fn provisioner(&self) -> &SandboxProvisioner {
        &self.provisioner
    }

    /// Run a statement with nothing to compare against
    ///
    /// Statement failures are reported in the result; only provisioning
    /// problems are returned as errors.
    pub async fn execute(&self, sql: &str) -> EngineResult<VerificationResult> {
        if sql.trim().is_empty() {
            return Err(EngineError::EmptyQuery);
        }

        let mut sandbox = self.provisioner.acquire().await?;
        let outcome = self.executor.query(&mut sandbox, sql).await;
        self.provisioner.release(sandbox).await;

        Ok(match outcome {
            Ok(output) => VerificationResult::executed(output),
            Err(e) => {
                tracing::debug!(error = %e, "Statement failed");
                VerificationResult::submission_failed(&e, None)
            }
        })
    }

    /// Check `submission` against `reference`
    ///
    /// A failing submission is a normal outcome and comes back as
    /// `success: false` with the reference rows attached. A failing
    /// reference or observation on the reference side is a defect in the
    /// problem and is returned as an error.
    pub async fn verify(
        &self,
        submission: &str,
        reference: &str,
        observation: Option<&str>,
    ) -> EngineResult<VerificationResult> {
        if submission.trim().is_empty() {
            return Err(EngineError::EmptyQuery);
        }

        let observation = observation.filter(|q| !q.trim().is_empty());
        let mode = if observation.is_some() {
            VerifyMode::Mutation
        } else {
            VerifyMode::Read
        };

        let (reference_db, submission_db) =
            tokio::join!(self.provisioner.acquire(), self.provisioner.acquire());
        let (mut reference_db, mut submission_db) = match (reference_db, submission_db) {
            (Ok(r), Ok(s)) => (r, s),
            (Ok(db), Err(e)) | (Err(e), Ok(db)) => {
                self.provisioner.release(db).await;
                return Err(e.into());
            }
            (Err(e), Err(_)) => return Err(e.into()),
        };

        let outcome = self
            .check(
                mode,
                (&mut reference_db, reference),
                (&mut submission_db, submission),
                observation,
            )
            .await;

        tokio::join!(
            self.provisioner.release(reference_db),
            self.provisioner.release(submission_db)
        );

        if let Ok(result) = &outcome {
            tracing::info!(
                mode = mode.as_str(),
                success = result.success,
                is_correct = ?result.is_correct,
                "Verified submission"
            );
        }

        outcome
    }

    async fn check(
        &self,
        mode: VerifyMode,
        (reference_db, reference): (&mut DatasetInstance, &str),
        (submission_db, submission): (&mut DatasetInstance, &str),
        observation: Option<&str>,
    ) -> EngineResult<VerificationResult> {
        let (expected, actual) = tokio::join!(
            self.run_side(reference_db, reference, observation),
            self.run_side(submission_db, submission, observation),
        );

        let expected = match expected {
            Ok(expected) => expected,
            Err(SideFailure::Statement(e)) => return Err(EngineError::Reference(e)),
            Err(SideFailure::Observation(e)) => return Err(EngineError::Observation(e)),
        };

        let actual = match actual {
            Ok(actual) => actual,
            Err(failure) => {
                let e = failure.into_statement_error();
                tracing::debug!(mode = mode.as_str(), error = %e, "Submission failed");
                return Ok(VerificationResult::submission_failed(&e, Some(expected.rows)));
            }
        };

        let is_correct = compare_results(&expected.rows, &actual.rows);
        Ok(VerificationResult::checked(actual, expected, is_correct))
    }

    /// Produce the rows one side is judged on
    async fn run_side(
        &self,
        db: &mut DatasetInstance,
        statement: &str,
        observation: Option<&str>,
    ) -> Result<QueryOutput, SideFailure> {
        match observation {
            None => self
                .executor
                .query(db, statement)
                .await
                .map_err(SideFailure::Statement),
            Some(observation) => {
                self.executor
                    .command(db, statement)
                    .await
                    .map_err(SideFailure::Statement)?;
                self.executor
                    .query(db, observation)
                    .await
                    .map_err(SideFailure::Observation)
            }
        }
    }

    /// Describe the tables of the template database
    pub async fn describe_schema(&self) -> EngineResult<Vec<TableInfo>> {
        let mut sandbox = self.provisioner.acquire().await?;
        let tables = self
            .executor
            .run_blocking(&mut sandbox, schema::read_tables)
            .await;
        self.provisioner.release(sandbox).await;
        tables.map_err(EngineError::Schema)
    }
}
