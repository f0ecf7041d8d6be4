//! Error types for dependency domain validation and parsing.

use super::TaskId;
use thiserror::Error;

/// Errors returned while constructing dependency domain values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DependencyDomainError {
    /// A task cannot block itself.
    #[error("task {0} cannot depend on itself")]
    SelfDependency(TaskId),

    /// The task label is empty after trimming.
    #[error("task label must not be empty")]
    EmptyTaskLabel,
}

/// Error returned while parsing task statuses from requests or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
