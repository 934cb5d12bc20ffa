//! Sandbox provisioning for isolated statement execution
//!
//! Every verification request works on private copies of a read-only
//! template database. A copy lives at a unique path under the scratch
//! directory and is deleted when the request releases it.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::Connection;
use tokio::fs;
use uuid::Uuid;

use crate::config::SandboxConfig;
use crate::error::ProvisionError;

/// A private, disposable copy of the template database
pub struct DatasetInstance {
    /// Unique identifier, also embedded in the file name
    id: Uuid,

    /// Location of the copy
    path: PathBuf,

    /// When the copy was made
    created_at: DateTime<Utc>,

    /// Open connection, `None` once closed or while lent to a worker
    conn: Option<Connection>,

    /// Set once the provisioner has deleted the backing file
    released: bool,
}

impl DatasetInstance {
    /// Get the instance identifier
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Get the path of the backing file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the creation timestamp
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether a connection is currently held
    pub fn is_open(&self) -> bool {
        self.conn.is_some()
    }

    pub(crate) fn take_connection(&mut self) -> Option<Connection> {
        self.conn.take()
    }

    pub(crate) fn restore_connection(&mut self, conn: Connection) {
        self.conn = Some(conn);
    }

    fn close(&mut self) {
        if let Some(conn) = self.conn.take() {
            if let Err((_, e)) = conn.close() {
                tracing::warn!(sandbox_id = %self.id, error = %e, "Failed to close sandbox connection");
            }
        }
    }
}

impl std::fmt::Debug for DatasetInstance {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatasetInstance")
            .field("id", &self.id)
            .field("path", &self.path)
            .field("created_at", &self.created_at)
            .field("open", &self.is_open())
            .finish()
    }
}

impl Drop for DatasetInstance {
    fn drop(&mut self) {
        if self.released {
            return;
        }
        // Backstop for paths that never reached release()
        self.close();
        match std::fs::remove_file(&self.path) {
            Ok(()) => tracing::debug!(sandbox_id = %self.id, "Removed unreleased sandbox on drop"),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                tracing::warn!(sandbox_id = %self.id, path = ?self.path, error = %e, "Failed to remove sandbox on drop")
            }
        }
    }
}

/// Produces and destroys sandbox copies of one template
#[derive(Debug, Clone)]
pub struct SandboxProvisioner {
    config: Arc<SandboxConfig>,
}

impl SandboxProvisioner {
    /// Create a provisioner for the configured template
    pub fn new(config: SandboxConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Get the provisioner configuration
    pub fn config(&self) -> &SandboxConfig {
        &self.config
    }

    /// Build a fresh, collision-free location for a copy
    fn next_location(&self) -> (Uuid, PathBuf) {
        let id = Uuid::new_v4();
        let file_name = format!("{}_{}.db", self.config.file_prefix, id);
        (id, self.config.scratch_dir.join(file_name))
    }

    /// Copy the template to a unique location and open it
    pub async fn acquire(&self) -> Result<DatasetInstance, ProvisionError> {
        let template = &self.config.template_path;
        match fs::metadata(template).await {
            Ok(meta) if meta.is_file() => {}
            _ => return Err(ProvisionError::TemplateMissing(template.clone())),
        }

        fs::create_dir_all(&self.config.scratch_dir)
            .await
            .map_err(|source| ProvisionError::ScratchDir {
                path: self.config.scratch_dir.clone(),
                source,
            })?;

        let (id, path) = self.next_location();

        if let Err(source) = fs::copy(template, &path).await {
            discard(&path).await;
            return Err(ProvisionError::Copy { path, source });
        }

        let open_path = path.clone();
        let opened = tokio::task::spawn_blocking(move || open_checked(&open_path)).await;

        let conn = match opened {
            Ok(Ok(conn)) => conn,
            Ok(Err(source)) => {
                discard(&path).await;
                return Err(ProvisionError::Open { path, source });
            }
            Err(e) => {
                discard(&path).await;
                return Err(ProvisionError::Worker(e.to_string()));
            }
        };

        tracing::debug!(sandbox_id = %id, path = ?path, "Acquired sandbox");

        Ok(DatasetInstance {
            id,
            path,
            created_at: Utc::now(),
            conn: Some(conn),
            released: false,
        })
    }

    /// Close the instance and delete its backing file
    ///
    /// Failures are logged and swallowed: by the time a sandbox is released
    /// the request already has its answer.
    pub async fn release(&self, mut instance: DatasetInstance) {
        instance.close();

        match fs::remove_file(&instance.path).await {
            Ok(()) => {
                tracing::debug!(sandbox_id = %instance.id, "Released sandbox");
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(sandbox_id = %instance.id, "Sandbox file already gone");
            }
            Err(e) => {
                tracing::warn!(
                    sandbox_id = %instance.id,
                    path = ?instance.path,
                    error = %e,
                    "Failed to delete sandbox file"
                );
            }
        }

        instance.released = true;
    }
}

/// Open a copy and touch the schema so a corrupt file fails here, not mid-request
fn open_checked(path: &Path) -> rusqlite::Result<Connection> {
    let conn = Connection::open(path)?;
    conn.query_row("SELECT count(*) FROM sqlite_master", [], |row| {
        row.get::<_, i64>(0)
    })?;
    Ok(conn)
}

async fn discard(path: &Path) {
    if let Err(e) = fs::remove_file(path).await {
        if e.kind() != std::io::ErrorKind::NotFound {
            tracing::warn!(path = ?path, error = %e, "Failed to remove partial sandbox copy");
        }
    }
}
