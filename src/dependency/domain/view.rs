//! Labelled read models returned to callers of the dependency engine.

use super::{DependencyEdge, DependencyId, Task, TaskId, TaskLabel, TaskStatus};
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Edge representation with both task labels resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRecord {
    /// Edge identifier.
    pub id: DependencyId,
    /// Task that must finish first.
    pub blocking_task_id: TaskId,
    /// Label of the blocking task.
    pub blocking_task_label: TaskLabel,
    /// Task being held back.
    pub blocked_task_id: TaskId,
    /// Label of the blocked task.
    pub blocked_task_label: TaskLabel,
    /// Edge creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Edge modification timestamp.
    pub updated_at: DateTime<Utc>,
}

impl DependencyRecord {
    /// Builds a record from an edge and the two tasks it references.
    #[must_use]
    pub fn new(edge: &DependencyEdge, blocking: &Task, blocked: &Task) -> Self {
        Self {
            id: edge.id(),
            blocking_task_id: edge.blocking(),
            blocking_task_label: blocking.label().clone(),
            blocked_task_id: edge.blocked(),
            blocked_task_label: blocked.label().clone(),
            created_at: edge.created_at(),
            updated_at: edge.updated_at(),
        }
    }
}

/// One neighbour of a task in its dependency view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyLink {
    /// Identifier of the edge joining the two tasks.
    pub dependency_id: DependencyId,
    /// Identifier of the neighbouring task.
    pub task_id: TaskId,
    /// Label of the neighbouring task.
    pub task_label: TaskLabel,
    /// Current status of the neighbouring task.
    pub task_status: TaskStatus,
}

impl DependencyLink {
    /// Builds a link to `neighbour` through `edge`.
    #[must_use]
    pub fn new(edge: &DependencyEdge, neighbour: &Task) -> Self {
        Self {
            dependency_id: edge.id(),
            task_id: neighbour.id(),
            task_label: neighbour.label().clone(),
            task_status: neighbour.status(),
        }
    }
}

/// Direct dependency edges of a single task. No transitive expansion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TaskDependencies {
    /// The task the view is centred on.
    pub task_id: TaskId,
    /// Label of that task.
    pub task_label: TaskLabel,
    /// Tasks this task blocks.
    pub blocks: Vec<DependencyLink>,
    /// Tasks blocking this task.
    pub blocked_by: Vec<DependencyLink>,
}

impl TaskDependencies {
    /// Returns identifiers of the tasks this task blocks.
    #[must_use]
    pub fn blocks_ids(&self) -> Vec<TaskId> {
        self.blocks.iter().map(|link| link.task_id).collect()
    }

    /// Returns identifiers of the tasks blocking this task.
    #[must_use]
    pub fn blocked_by_ids(&self) -> Vec<TaskId> {
        self.blocked_by.iter().map(|link| link.task_id).collect()
    }
}

/// Edges added and removed by a replace-outgoing-set call.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EdgeReconciliation {
    /// Newly inserted edges.
    pub added: Vec<DependencyEdge>,
    /// Deleted edges.
    pub removed: Vec<DependencyEdge>,
}

impl EdgeReconciliation {
    /// Returns `true` when the call changed nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}
