//! Problem lookup abstraction
//!
//! Request handlers only need `get` and `list`; where problems live is up to
//! the implementation.

use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;

use crate::{Difficulty, Problem};

/// Problem loading errors
#[derive(Debug, Error)]
pub enum ProblemError {
    #[error("IO error reading {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse problem file {}: {message}", .path.display())]
    Parse { path: PathBuf, message: String },

    #[error("Duplicate problem id: {0}")]
    Duplicate(String),
}

/// Result type for problem operations
pub type ProblemResult<T> = Result<T, ProblemError>;

/// Fail on the first id that appears twice
pub(crate) fn ensure_unique_ids(problems: &[Problem]) -> ProblemResult<()> {
    let mut seen = std::collections::HashSet::new();
    for problem in problems {
        if !seen.insert(problem.id.as_str()) {
            return Err(ProblemError::Duplicate(problem.id.clone()));
        }
    }
    Ok(())
}

/// Source of problem definitions
#[async_trait]
pub trait ProblemRepository: Send + Sync {
    /// Look up a problem by id
    async fn get(&self, id: &str) -> Option<Problem>;

    /// All problems in presentation order
    async fn list(&self) -> Vec<Problem>;

    /// Problems of one difficulty tier
    async fn list_by_difficulty(&self, difficulty: Difficulty) -> Vec<Problem> {
        self.list()
            .await
            .into_iter()
            .filter(|p| p.difficulty == difficulty)
            .collect()
    }
}

/// Repository over a fixed set of problems
#[derive(Debug, Clone, Default)]
pub struct InMemoryProblemRepository {
    problems: Vec<Problem>,
}

impl InMemoryProblemRepository {
    /// Create a repository, rejecting duplicate ids
    pub fn new(problems: Vec<Problem>) -> ProblemResult<Self> {
        ensure_unique_ids(&problems)?;
        Ok(Self { problems })
    }

    /// Wrap problems whose ids were already checked
    pub(crate) fn from_unique(problems: Vec<Problem>) -> Self {
        Self { problems }
    }

    pub fn len(&self) -> usize {
        self.problems.len()
    }

    pub fn is_empty(&self) -> bool {
        self.problems.is_empty()
    }
}

#[async_trait]
impl ProblemRepository for InMemoryProblemRepository {
    async fn get(&self, id: &str) -> Option<Problem> {
        self.problems.iter().find(|p| p.id == id).cloned()
    }

    async fn list(&self) -> Vec<Problem> {
        self.problems.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problems() -> Vec<Problem> {
        vec![
            Problem::new("basic-001", "Artists", "List artists", Difficulty::Basic, "SELECT * FROM artists"),
            Problem::new("advanced-001", "Top albums", "Rank albums", Difficulty::Advanced, "SELECT 1"),
            Problem::new("basic-002", "Add artist", "Insert", Difficulty::Basic, "INSERT INTO artists (Name) VALUES ('x')")
                .with_verification_query("SELECT * FROM artists"),
        ]
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let repo = InMemoryProblemRepository::new(problems()).unwrap();
        let problem = repo.get("basic-002").await.unwrap();
        assert!(problem.is_mutation());
        assert!(repo.get("missing").await.is_none());
    }

    #[tokio::test]
    async fn test_list_keeps_order() {
        let repo = InMemoryProblemRepository::new(problems()).unwrap();
        let ids: Vec<_> = repo.list().await.into_iter().map(|p| p.id).collect();
        assert_eq!(ids, vec!["basic-001", "advanced-001", "basic-002"]);
    }

    #[tokio::test]
    async fn test_list_by_difficulty() {
        let repo = InMemoryProblemRepository::new(problems()).unwrap();
        assert_eq!(repo.list_by_difficulty(Difficulty::Basic).await.len(), 2);
        assert_eq!(repo.list_by_difficulty(Difficulty::Extreme).await.len(), 0);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut all = problems();
        all.push(all[0].clone());
        let err = InMemoryProblemRepository::new(all).unwrap_err();
        assert!(matches!(err, ProblemError::Duplicate(id) if id == "basic-001"));
    }
}
