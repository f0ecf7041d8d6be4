//! Status transition verdicts and per-task bulk outcomes.

use super::{TaskId, TaskStatus};
use serde::Serialize;

/// Verdict of the status transition gate for one task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "verdict", rename_all = "snake_case")]
pub enum Authorization {
    /// The requested status may be written.
    Allowed,
    /// The task still has blockers that are not done.
    Denied {
        /// Unresolved blocking tasks.
        blockers: Vec<TaskId>,
    },
}

impl Authorization {
    /// Returns `true` for [`Authorization::Allowed`].
    #[must_use]
    pub const fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed)
    }

    /// Returns the unresolved blockers, empty when allowed.
    #[must_use]
    pub fn blockers(&self) -> &[TaskId] {
        match self {
            Self::Allowed => &[],
            Self::Denied { blockers } => blockers,
        }
    }
}

/// What happened to one task in a bulk status change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StatusChangeOutcome {
    /// The new status was written.
    Applied {
        /// Status now stored on the task.
        status: TaskStatus,
    },
    /// Unresolved blockers prevented the change.
    Denied {
        /// Unresolved blocking tasks.
        blockers: Vec<TaskId>,
    },
    /// The task does not exist.
    NotFound,
    /// The change was authorized but discarded because another item in an
    /// all-or-nothing batch failed.
    RolledBack,
    /// The store failed while reading or writing this task.
    Failed {
        /// Rendered store error.
        reason: String,
    },
}

/// Bulk status result for a single requested task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskStatusResult {
    /// Requested task.
    pub task_id: TaskId,
    /// Outcome for that task.
    #[serde(flatten)]
    pub outcome: StatusChangeOutcome,
}

impl TaskStatusResult {
    /// Returns `true` when the status was written.
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self.outcome, StatusChangeOutcome::Applied { .. })
    }
}
