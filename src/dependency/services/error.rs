//! Service-level errors for dependency graph and status operations.

use crate::dependency::{
    domain::{
        BlockingPair, DependencyDomainError, DependencyId, ParseTaskStatusError, TaskId,
        TaskStatus,
    },
    ports::{EdgeStoreError, GraphFenceError, TaskStoreError},
};
use thiserror::Error;

/// Errors raised by dependency services.
#[derive(Debug, Error)]
pub enum DependencyServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] DependencyDomainError),

    /// Task store operation failed.
    #[error(transparent)]
    TaskStore(#[from] TaskStoreError),

    /// Edge store operation failed.
    #[error(transparent)]
    EdgeStore(#[from] EdgeStoreError),

    /// The cross-process graph fence could not be entered.
    #[error(transparent)]
    Fence(#[from] GraphFenceError),

    /// A referenced task does not exist.
    #[error("task {0} not found")]
    TaskNotFound(TaskId),

    /// No edge exists with the given identifier.
    #[error("dependency {0} not found")]
    DependencyNotFound(DependencyId),

    /// No edge exists for the given pair.
    #[error("no dependency from {blocking} to {blocked}")]
    PairNotFound {
        /// Requested blocking task.
        blocking: TaskId,
        /// Requested blocked task.
        blocked: TaskId,
    },

    /// The exact edge already exists.
    #[error("dependency {0} already exists")]
    DuplicateDependency(BlockingPair),

    /// Adding the edge would close a cycle.
    #[error("dependency {0} would create a cycle")]
    CycleDetected(BlockingPair),

    /// The requested status is gated on blockers that are not done.
    #[error("task {task_id} cannot move to {status}: {} unresolved blocker(s)", blockers.len())]
    TransitionBlocked {
        /// Task whose transition was denied.
        task_id: TaskId,
        /// Requested status.
        status: TaskStatus,
        /// Unresolved blocking tasks.
        blockers: Vec<TaskId>,
    },

    /// A required identifier was nil.
    #[error("missing {0} identifier")]
    MissingIdentifier(&'static str),

    /// The requested status could not be parsed.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
}

/// Caller-facing classification of [`DependencyServiceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DependencyErrorKind {
    /// A referenced task or edge does not exist.
    NotFound,
    /// A business rule rejected the request.
    Conflict,
    /// The request was malformed.
    Validation,
    /// The underlying store failed.
    Persistence,
}

impl DependencyServiceError {
    /// Classifies the error for callers that map it onto responses.
    #[must_use]
    pub const fn kind(&self) -> DependencyErrorKind {
        match self {
            Self::TaskNotFound(_)
            | Self::DependencyNotFound(_)
            | Self::PairNotFound { .. }
            | Self::TaskStore(TaskStoreError::NotFound(_)) => DependencyErrorKind::NotFound,
            Self::Domain(DependencyDomainError::SelfDependency(_))
            | Self::DuplicateDependency(_)
            | Self::CycleDetected(_)
            | Self::TransitionBlocked { .. }
            | Self::TaskStore(TaskStoreError::DuplicateTask(_))
            | Self::EdgeStore(
                EdgeStoreError::DuplicateEdge(_) | EdgeStoreError::DuplicateId(_),
            ) => DependencyErrorKind::Conflict,
            Self::Domain(DependencyDomainError::EmptyTaskLabel)
            | Self::MissingIdentifier(_)
            | Self::InvalidStatus(_) => DependencyErrorKind::Validation,
            Self::TaskStore(TaskStoreError::Persistence(_))
            | Self::EdgeStore(EdgeStoreError::Persistence(_))
            | Self::Fence(_) => DependencyErrorKind::Persistence,
        }
    }
}

/// Result type for dependency service operations.
pub type DependencyServiceResult<T> = Result<T, DependencyServiceError>;
