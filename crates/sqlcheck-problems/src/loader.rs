//! Problem loading from YAML/JSON files
//!
//! Loads problem definitions from the built-in problems directory or a
//! custom path. One file holds one problem.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::repository::{InMemoryProblemRepository, ProblemError, ProblemResult, ensure_unique_ids};
use crate::Problem;

/// Loader for problem definitions
pub struct ProblemLoader {
    /// Base directory for problem files
    problems_dir: PathBuf,
}

impl ProblemLoader {
    /// Create a new loader for the given directory
    pub fn new(problems_dir: impl AsRef<Path>) -> Self {
        Self {
            problems_dir: problems_dir.as_ref().to_path_buf(),
        }
    }

    /// Create a loader for built-in problems
    pub fn builtin() -> Self {
        // The problems directory is relative to the crate root
        let manifest_dir = env!("CARGO_MANIFEST_DIR");
        Self::new(Path::new(manifest_dir).join("problems"))
    }

    /// Get the directory being loaded
    pub fn problems_dir(&self) -> &Path {
        &self.problems_dir
    }

    /// Load all problems, ordered by difficulty then id
    ///
    /// Files that cannot be read or parsed are skipped with a warning; a
    /// repeated id is an error because lookups would become ambiguous.
    pub fn load_all(&self) -> ProblemResult<Vec<Problem>> {
        let mut problems = Vec::new();

        if !self.problems_dir.exists() {
            tracing::warn!(dir = ?self.problems_dir, "Problems directory does not exist");
            return Ok(problems);
        }

        for entry in WalkDir::new(&self.problems_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if Self::is_problem_file(path) {
                match Self::load_problem_file(path) {
                    Ok(problem) => problems.push(problem),
                    Err(e) => {
                        tracing::warn!("Failed to load problem from {:?}: {}", path, e);
                    }
                }
            }
        }

        ensure_unique_ids(&problems)?;

        problems.sort_by(|a, b| {
            a.difficulty
                .cmp(&b.difficulty)
                .then_with(|| a.id.cmp(&b.id))
        });

        tracing::debug!(count = problems.len(), dir = ?self.problems_dir, "Loaded problems");
        Ok(problems)
    }

    /// Load everything into an in-memory repository
    pub fn load_repository(&self) -> ProblemResult<InMemoryProblemRepository> {
        self.load_all().map(InMemoryProblemRepository::from_unique)
    }

    /// Load a problem from a file path
    fn load_problem_file(path: &Path) -> ProblemResult<Problem> {
        let content = std::fs::read_to_string(path).map_err(|source| ProblemError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let parsed = if path.extension().is_some_and(|ext| ext == "yaml" || ext == "yml") {
            serde_yaml::from_str(&content).map_err(|e| e.to_string())
        } else {
            serde_json::from_str(&content).map_err(|e| e.to_string())
        };

        parsed.map_err(|message| ProblemError::Parse {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Check if a path is a problem file
    fn is_problem_file(path: &Path) -> bool {
        if !path.is_file() {
            return false;
        }

        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml") | Some("json")
        )
    }
}
