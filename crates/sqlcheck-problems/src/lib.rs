//! SQL practice problems
//!
//! This crate provides:
//! - The [`Problem`] definition and its [`Difficulty`] tiers
//! - The [`ProblemRepository`] lookup trait consumed by request handlers
//! - An in-memory repository and a loader for YAML/JSON problem directories

pub mod loader;
pub mod problem;
pub mod repository;

pub use loader::ProblemLoader;
pub use problem::{Difficulty, Problem};
pub use repository::{InMemoryProblemRepository, ProblemError, ProblemRepository, ProblemResult};
