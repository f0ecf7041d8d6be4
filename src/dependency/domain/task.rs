//! Task record and status types read and written by the dependency engine.

use super::{ParseTaskStatusError, TaskId, TaskLabel};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};

/// Task workflow status.
///
/// The engine enforces no ordering between statuses. Only entry into
/// [`TaskStatus::InProgress`] and [`TaskStatus::Done`] is gated on the
/// task's blockers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Work has not started.
    Todo,
    /// Work is underway.
    InProgress,
    /// Work is finished and awaiting sign-off.
    WaitingForApproval,
    /// Work is complete. Only this status resolves a blocker.
    Done,
    /// Task is parked and no longer tracked actively.
    Inactive,
}

impl TaskStatus {
    /// All statuses in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Todo,
        Self::InProgress,
        Self::WaitingForApproval,
        Self::Done,
        Self::Inactive,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Todo => "todo",
            Self::InProgress => "in_progress",
            Self::WaitingForApproval => "waiting_for_approval",
            Self::Done => "done",
            Self::Inactive => "inactive",
        }
    }

    /// Returns `true` when moving into this status requires every blocker
    /// of the task to be [`TaskStatus::Done`].
    #[must_use]
    pub const fn requires_resolved_blockers(self) -> bool {
        matches!(self, Self::InProgress | Self::Done)
    }

    /// Returns `true` when a blocker in this status no longer holds back
    /// the tasks it blocks.
    #[must_use]
    pub const fn resolves_blocker(self) -> bool {
        matches!(self, Self::Done)
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase();
        match normalized.as_str() {
            "todo" => Ok(Self::Todo),
            "in_progress" => Ok(Self::InProgress),
            "waiting_for_approval" => Ok(Self::WaitingForApproval),
            "done" => Ok(Self::Done),
            "inactive" => Ok(Self::Inactive),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A unit of work owned by the surrounding project-management domain.
///
/// The dependency engine reads identity, label, and status, and writes
/// status. Effort figures are carried through untouched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    label: TaskLabel,
    status: TaskStatus,
    planned_minutes: Option<u32>,
    actual_minutes: Option<u32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Parameter object for reconstructing a persisted task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted label.
    pub label: TaskLabel,
    /// Persisted workflow status.
    pub status: TaskStatus,
    /// Planned effort in minutes, if estimated.
    pub planned_minutes: Option<u32>,
    /// Actual effort in minutes, if recorded.
    pub actual_minutes: Option<u32>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted latest modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl Task {
    /// Creates a new task in [`TaskStatus::Todo`].
    #[must_use]
    pub fn new(label: TaskLabel, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: TaskId::new(),
            label,
            status: TaskStatus::Todo,
            planned_minutes: None,
            actual_minutes: None,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            label: data.label,
            status: data.status,
            planned_minutes: data.planned_minutes,
            actual_minutes: data.actual_minutes,
            created_at: data.created_at,
            updated_at: data.updated_at,
        }
    }

    /// Sets the initial status.
    #[must_use]
    pub const fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets planned effort in minutes.
    #[must_use]
    pub const fn with_planned_minutes(mut self, minutes: u32) -> Self {
        self.planned_minutes = Some(minutes);
        self
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the task label.
    #[must_use]
    pub const fn label(&self) -> &TaskLabel {
        &self.label
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns planned effort in minutes, if estimated.
    #[must_use]
    pub const fn planned_minutes(&self) -> Option<u32> {
        self.planned_minutes
    }

    /// Returns actual effort in minutes, if recorded.
    #[must_use]
    pub const fn actual_minutes(&self) -> Option<u32> {
        self.actual_minutes
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Writes a new status and touches the modification timestamp.
    ///
    /// No dependency checks happen here; callers authorize the change
    /// first through the status transition gate.
    pub fn set_status(&mut self, status: TaskStatus, clock: &impl Clock) {
        self.status = status;
        self.updated_at = clock.utc();
    }
}
