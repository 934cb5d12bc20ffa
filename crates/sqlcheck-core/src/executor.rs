//! Statement execution inside a sandbox
//!
//! SQLite calls block, so each statement runs on the blocking pool with the
//! sandbox connection moved into the worker and handed back afterwards. A
//! statement that outlives the time limit is interrupted through the
//! connection's interrupt handle.

use std::time::Duration;

use rusqlite::{Batch, Connection};

use crate::config::EngineConfig;
use crate::error::{SqlErrorKind, StatementError};
use crate::sandbox::DatasetInstance;
use crate::value::{QueryOutput, Row, Value};

/// Interval between interrupts of a statement past its time limit
const INTERRUPT_RETRY: Duration = Duration::from_millis(25);

/// Runs statements against dataset instances under fixed limits
#[derive(Debug, Clone, Copy)]
pub struct StatementExecutor {
    timeout: Duration,
    max_rows: usize,
}

impl StatementExecutor {
    pub fn new(timeout: Duration, max_rows: usize) -> Self {
        Self { timeout, max_rows }
    }

    pub fn from_config(config: &EngineConfig) -> Self {
        Self::new(config.statement_timeout, config.max_rows)
    }

    /// Run a statement that returns rows
    pub async fn query(
        &self,
        instance: &mut DatasetInstance,
        sql: &str,
    ) -> Result<QueryOutput, StatementError> {
        let sql = sql.to_string();
        let max_rows = self.max_rows;
        self.run_blocking(instance, move |conn| collect_rows(conn, &sql, max_rows))
            .await
    }

    /// Run one or more statements for their side effects
    pub async fn command(
        &self,
        instance: &mut DatasetInstance,
        sql: &str,
    ) -> Result<(), StatementError> {
        let sql = sql.to_string();
        self.run_blocking(instance, move |conn| {
            conn.execute_batch(&sql)?;
            Ok(())
        })
        .await
    }

    /// Lend the instance's connection to a blocking worker, bounded by the timeout
    pub(crate) async fn run_blocking<T, F>(
        &self,
        instance: &mut DatasetInstance,
        f: F,
    ) -> Result<T, StatementError>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> Result<T, StatementError> + Send + 'static,
    {
        let conn = instance.take_connection().ok_or(StatementError::Closed)?;
        let interrupt = conn.get_interrupt_handle();

        let mut handle = tokio::task::spawn_blocking(move || {
            let result = f(&conn);
            (conn, result)
        });

        let mut timed_out = false;
        let joined = match tokio::time::timeout(self.timeout, &mut handle).await {
            Ok(joined) => joined,
            Err(_) => {
                timed_out = true;
                tracing::warn!(
                    sandbox_id = %instance.id(),
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Interrupting statement past its time limit"
                );
                // An interrupt is a no-op until the worker has a statement
                // running, so repeat it until the worker hands back
                loop {
                    interrupt.interrupt();
                    match tokio::time::timeout(INTERRUPT_RETRY, &mut handle).await {
                        Ok(joined) => break joined,
                        Err(_) => continue,
                    }
                }
            }
        };

        let (conn, result) = joined.map_err(|e| StatementError::Worker(e.to_string()))?;
        instance.restore_connection(conn);

        match result {
            Err(StatementError::Sql { .. }) if timed_out => {
                Err(StatementError::Timeout(self.timeout))
            }
            other => other,
        }
    }
}

/// Prepare exactly one statement; trailing whitespace, comments and `;` are fine
fn prepare_single<'conn>(
    conn: &'conn Connection,
    sql: &str,
) -> Result<rusqlite::Statement<'conn>, StatementError> {
    let mut batch = Batch::new(conn, sql);
    let Some(stmt) = batch.next()? else {
        return Err(StatementError::Sql {
            kind: SqlErrorKind::Execution,
            message: "The supplied SQL string contains no statement".to_string(),
        });
    };
    if batch.next()?.is_some() {
        return Err(StatementError::Sql {
            kind: SqlErrorKind::Execution,
            message: "The supplied SQL string contains more than one statement".to_string(),
        });
    }
    Ok(stmt)
}

fn collect_rows(conn: &Connection, sql: &str, max_rows: usize) -> Result<QueryOutput, StatementError> {
    let mut stmt = prepare_single(conn, sql)?;
    if stmt.column_count() == 0 {
        return Err(StatementError::Sql {
            kind: SqlErrorKind::Execution,
            message: "This statement does not return data".to_string(),
        });
    }

    let names: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let mut rows = stmt.query([])?;
    let mut collected = Vec::new();

    while let Some(row) = rows.next()? {
        if collected.len() >= max_rows {
            return Err(StatementError::TooManyRows(max_rows));
        }
        let mut out = Row::with_capacity(names.len());
        for (idx, name) in names.iter().enumerate() {
            out.set(name.clone(), Value::from(row.get_ref(idx)?));
        }
        collected.push(out);
    }

    Ok(QueryOutput::from_rows(collected))
}
