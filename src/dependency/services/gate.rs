//! Dependency precondition for task status transitions.

use super::{DependencyServiceError, DependencyServiceResult};
use crate::dependency::{
    domain::{Authorization, DependencyEdge, Task, TaskId, TaskStatus},
    ports::{EdgeStore, TaskStore},
};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// Authorizes status changes against a task's direct blockers.
///
/// The gate only reads. Writing the authorized status is left to the caller.
#[derive(Clone)]
pub struct StatusTransitionGate<T, E>
where
    T: TaskStore,
    E: EdgeStore,
{
    tasks: Arc<T>,
    edges: Arc<E>,
}

impl<T, E> StatusTransitionGate<T, E>
where
    T: TaskStore,
    E: EdgeStore,
{
    /// Creates a gate over the given stores.
    #[must_use]
    pub const fn new(tasks: Arc<T>, edges: Arc<E>) -> Self {
        Self { tasks, edges }
    }

    /// Decides whether `task_id` may move to `requested`.
    ///
    /// Moves into `InProgress` or `Done` are denied while any direct blocker
    /// is not `Done`. Other statuses are never gated, and
    /// `ignore_dependency_rules` skips the check entirely.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::TaskNotFound`] when the task is
    /// missing, or store errors.
    pub async fn authorize(
        &self,
        task_id: TaskId,
        requested: TaskStatus,
        ignore_dependency_rules: bool,
    ) -> DependencyServiceResult<Authorization> {
        let task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DependencyServiceError::TaskNotFound(task_id))?;
        self.authorize_task(&task, requested, ignore_dependency_rules)
            .await
    }

    pub(crate) async fn authorize_task(
        &self,
        task: &Task,
        requested: TaskStatus,
        ignore_dependency_rules: bool,
    ) -> DependencyServiceResult<Authorization> {
        if ignore_dependency_rules || !requested.requires_resolved_blockers() {
            return Ok(Authorization::Allowed);
        }

        let blockers = self.unresolved_blockers(task.id()).await?;
        if blockers.is_empty() {
            return Ok(Authorization::Allowed);
        }
        debug!(task = %task.id(), %requested, blockers = blockers.len(), "transition gated");
        Ok(Authorization::Denied { blockers })
    }

    /// Returns the direct blockers of `task_id` that are not `Done`.
    ///
    /// A blocker whose task record cannot be found counts as unresolved.
    ///
    /// # Errors
    ///
    /// Returns store errors.
    pub async fn unresolved_blockers(
        &self,
        task_id: TaskId,
    ) -> DependencyServiceResult<Vec<TaskId>> {
        let blocker_ids: Vec<TaskId> = self
            .edges
            .find_by_blocked(task_id)
            .await?
            .iter()
            .map(DependencyEdge::blocking)
            .collect();
        if blocker_ids.is_empty() {
            return Ok(blocker_ids);
        }

        let statuses: HashMap<TaskId, TaskStatus> = self
            .tasks
            .find_by_ids(&blocker_ids)
            .await?
            .iter()
            .map(|blocker| (blocker.id(), blocker.status()))
            .collect();
        Ok(blocker_ids
            .into_iter()
            .filter(|id| !statuses.get(id).is_some_and(|status| status.resolves_blocker()))
            .collect())
    }
}
