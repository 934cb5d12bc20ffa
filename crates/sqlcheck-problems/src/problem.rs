//! Problem definition and difficulty tiers

use serde::{Deserialize, Serialize};

/// Difficulty tier of a problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Basic,
    Advanced,
    Extreme,
}

impl Difficulty {
    /// Get display name
    pub fn display_name(&self) -> &'static str {
        match self {
            Difficulty::Basic => "Basic",
            Difficulty::Advanced => "Advanced",
            Difficulty::Extreme => "Extreme",
        }
    }

    /// Get all tiers, easiest first
    pub fn all() -> &'static [Difficulty] {
        &[Difficulty::Basic, Difficulty::Advanced, Difficulty::Extreme]
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "basic" => Ok(Difficulty::Basic),
            "advanced" => Ok(Difficulty::Advanced),
            "extreme" => Ok(Difficulty::Extreme),
            other => Err(format!("Unknown difficulty: {}", other)),
        }
    }
}

/// A practice problem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Problem {
    /// Unique identifier, e.g. `basic_001`
    pub id: String,

    pub title: String,

    /// Prompt shown to the learner
    pub description: String,

    pub difficulty: Difficulty,

    #[serde(default)]
    pub tags: Vec<String>,

    /// Reference solution
    pub example_answer: String,

    /// Query observing the effect of a mutating reference solution
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verification_query: Option<String>,
}

impl Problem {
    /// Create a read-mode problem
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        description: impl Into<String>,
        difficulty: Difficulty,
        example_answer: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: description.into(),
            difficulty,
            tags: Vec::new(),
            example_answer: example_answer.into(),
            verification_query: None,
        }
    }

    /// Set the observation query, turning this into a mutation problem
    pub fn with_verification_query(mut self, query: impl Into<String>) -> Self {
        self.verification_query = Some(query.into());
        self
    }

    /// Add a tag
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }

    /// Whether the reference solution mutates data
    pub fn is_mutation(&self) -> bool {
        self.verification_query
            .as_deref()
            .is_some_and(|q| !q.trim().is_empty())
    }
}
