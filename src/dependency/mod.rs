//! Cross-actor prerequisite graph with cycle detection.

pub mod manager;

pub use manager::{DependencyError, DependencyManager};
