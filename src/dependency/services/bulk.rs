//! Status changes gated on dependency state, for one task or many.

use super::{
    BulkPolicy, DependencyConfig, DependencyServiceError, DependencyServiceResult, GraphLock,
    StatusTransitionGate, manager::ensure_present,
};
use crate::dependency::{
    domain::{Authorization, StatusChangeOutcome, Task, TaskId, TaskStatus, TaskStatusResult},
    ports::{EdgeStore, TaskStore},
};
use mockable::Clock;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{info, warn};

/// Request payload for changing the status of one task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransitionTaskRequest {
    task_id: TaskId,
    status: String,
    ignore_dependency_rules: bool,
}

impl TransitionTaskRequest {
    /// Creates a request. `status` uses the snake_case storage form.
    #[must_use]
    pub fn new(task_id: TaskId, status: impl Into<String>) -> Self {
        Self {
            task_id,
            status: status.into(),
            ignore_dependency_rules: false,
        }
    }

    /// Bypasses the dependency check (administrative override).
    #[must_use]
    pub const fn ignoring_dependency_rules(mut self, ignore: bool) -> Self {
        self.ignore_dependency_rules = ignore;
        self
    }
}

/// Request payload for changing the status of many tasks at once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BulkStatusRequest {
    task_ids: Vec<TaskId>,
    status: String,
    ignore_dependency_rules: bool,
}

impl BulkStatusRequest {
    /// Creates a request. `status` uses the snake_case storage form.
    #[must_use]
    pub fn new(task_ids: impl IntoIterator<Item = TaskId>, status: impl Into<String>) -> Self {
        Self {
            task_ids: task_ids.into_iter().collect(),
            status: status.into(),
            ignore_dependency_rules: false,
        }
    }

    /// Bypasses the dependency check for every task in the batch.
    #[must_use]
    pub const fn ignoring_dependency_rules(mut self, ignore: bool) -> Self {
        self.ignore_dependency_rules = ignore;
        self
    }
}

/// Result of running one task through the gate.
enum Evaluation {
    Authorized(Task),
    Rejected(StatusChangeOutcome),
}

/// Applies status changes through the [`StatusTransitionGate`].
#[derive(Clone)]
pub struct BulkStatusOrchestrator<T, E, C>
where
    T: TaskStore,
    E: EdgeStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    gate: StatusTransitionGate<T, E>,
    clock: Arc<C>,
    lock: GraphLock,
    config: DependencyConfig,
}

impl<T, E, C> BulkStatusOrchestrator<T, E, C>
where
    T: TaskStore,
    E: EdgeStore,
    C: Clock + Send + Sync,
{
    /// Creates an orchestrator with the default configuration.
    ///
    /// Pass a clone of the [`GraphLock`] used by the dependency manager so
    /// status writes are serialized against edge mutations.
    #[must_use]
    pub fn new(tasks: Arc<T>, edges: Arc<E>, clock: Arc<C>, lock: GraphLock) -> Self {
        let gate = StatusTransitionGate::new(Arc::clone(&tasks), edges);
        Self {
            tasks,
            gate,
            clock,
            lock,
            config: DependencyConfig::default(),
        }
    }

    /// Replaces the configuration.
    #[must_use]
    pub const fn with_config(mut self, config: DependencyConfig) -> Self {
        self.config = config;
        self
    }

    /// Changes the status of a single task.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::InvalidStatus`] for an unknown
    /// status, [`DependencyServiceError::TaskNotFound`] when the task is
    /// missing, [`DependencyServiceError::TransitionBlocked`] when blockers
    /// are unresolved, or store errors.
    pub async fn transition_task(
        &self,
        request: TransitionTaskRequest,
    ) -> DependencyServiceResult<Task> {
        let status = TaskStatus::try_from(request.status.as_str())?;
        let task_id = request.task_id;
        ensure_present(task_id, "task")?;

        let _guard = self.lock.acquire().await?;
        let mut task = self
            .tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DependencyServiceError::TaskNotFound(task_id))?;
        let authorization = self
            .gate
            .authorize_task(&task, status, request.ignore_dependency_rules)
            .await?;
        if let Authorization::Denied { blockers } = authorization {
            warn!(task = %task_id, %status, blockers = blockers.len(), "transition denied");
            return Err(DependencyServiceError::TransitionBlocked {
                task_id,
                status,
                blockers,
            });
        }

        task.set_status(status, &*self.clock);
        self.tasks.update(&task).await?;
        info!(task = %task_id, %status, "task status changed");
        Ok(task)
    }

    /// Changes the status of every task in the request.
    ///
    /// Returns one result per requested task, in request order. Denials and
    /// store failures are reported per task rather than failing the call.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::InvalidStatus`] for an unknown
    /// status and [`DependencyServiceError::MissingIdentifier`] for a nil
    /// task identifier. Nothing is evaluated in either case. Under
    /// [`BulkPolicy::AllOrNothing`] a [`DependencyServiceError::Fence`]
    /// failure also fails the call.
    pub async fn apply(
        &self,
        request: BulkStatusRequest,
    ) -> DependencyServiceResult<Vec<TaskStatusResult>> {
        let status = TaskStatus::try_from(request.status.as_str())?;
        for task_id in &request.task_ids {
            ensure_present(*task_id, "task")?;
        }

        let results = match self.config.bulk {
            BulkPolicy::BestEffort => {
                self.apply_best_effort(&request.task_ids, status, request.ignore_dependency_rules)
                    .await
            }
            BulkPolicy::AllOrNothing => {
                self.apply_all_or_nothing(
                    &request.task_ids,
                    status,
                    request.ignore_dependency_rules,
                )
                .await?
            }
        };
        info!(
            %status,
            requested = results.len(),
            applied = results.iter().filter(|result| result.is_applied()).count(),
            "bulk status change finished"
        );
        Ok(results)
    }

    async fn apply_best_effort(
        &self,
        task_ids: &[TaskId],
        status: TaskStatus,
        ignore_dependency_rules: bool,
    ) -> Vec<TaskStatusResult> {
        let mut results = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            let outcome = match self.lock.acquire().await {
                Ok(_guard) => {
                    self.change_one(task_id, status, ignore_dependency_rules)
                        .await
                }
                Err(err) => failed(task_id, &DependencyServiceError::from(err)),
            };
            results.push(TaskStatusResult { task_id, outcome });
        }
        results
    }

    /// Evaluates and writes one task. The caller holds the graph lock.
    async fn change_one(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        ignore_dependency_rules: bool,
    ) -> StatusChangeOutcome {
        match self.evaluate(task_id, status, ignore_dependency_rules).await {
            Ok(Evaluation::Authorized(mut task)) => {
                task.set_status(status, &*self.clock);
                match self.tasks.update(&task).await {
                    Ok(()) => StatusChangeOutcome::Applied { status },
                    Err(err) => failed(task_id, &DependencyServiceError::from(err)),
                }
            }
            Ok(Evaluation::Rejected(outcome)) => outcome,
            Err(err) => failed(task_id, &err),
        }
    }

    async fn apply_all_or_nothing(
        &self,
        task_ids: &[TaskId],
        status: TaskStatus,
        ignore_dependency_rules: bool,
    ) -> DependencyServiceResult<Vec<TaskStatusResult>> {
        let _guard = self.lock.acquire().await?;
        let mut evaluations = Vec::with_capacity(task_ids.len());
        for &task_id in task_ids {
            let evaluation = self.evaluate(task_id, status, ignore_dependency_rules).await;
            evaluations.push((task_id, evaluation));
        }

        let all_authorized = evaluations
            .iter()
            .all(|(_, evaluation)| matches!(evaluation, Ok(Evaluation::Authorized(_))));
        if !all_authorized {
            warn!(%status, "bulk status change rejected as a whole");
            return Ok(evaluations
                .into_iter()
                .map(|(task_id, evaluation)| TaskStatusResult {
                    task_id,
                    outcome: match evaluation {
                        Ok(Evaluation::Authorized(_)) => StatusChangeOutcome::RolledBack,
                        Ok(Evaluation::Rejected(outcome)) => outcome,
                        Err(err) => failed(task_id, &err),
                    },
                })
                .collect());
        }

        let originals: Vec<Task> = evaluations
            .into_iter()
            .filter_map(|(_, evaluation)| match evaluation {
                Ok(Evaluation::Authorized(task)) => Some(task),
                _ => None,
            })
            .collect();
        Ok(self.write_all(&originals, status).await)
    }

    /// Writes every task, restoring the already-written ones if a write fails.
    async fn write_all(&self, originals: &[Task], status: TaskStatus) -> Vec<TaskStatusResult> {
        for (position, original) in originals.iter().enumerate() {
            let mut updated = original.clone();
            updated.set_status(status, &*self.clock);
            if let Err(err) = self.tasks.update(&updated).await {
                let written = originals.get(..position).unwrap_or_default();
                let restored = self.restore(written).await;
                let error = DependencyServiceError::from(err);
                return originals
                    .iter()
                    .enumerate()
                    .map(|(index, task)| {
                        let outcome = if index == position {
                            failed(task.id(), &error)
                        } else if index < position && !restored.contains(&task.id()) {
                            StatusChangeOutcome::Applied { status }
                        } else {
                            StatusChangeOutcome::RolledBack
                        };
                        TaskStatusResult {
                            task_id: task.id(),
                            outcome,
                        }
                    })
                    .collect();
            }
        }

        originals
            .iter()
            .map(|task| TaskStatusResult {
                task_id: task.id(),
                outcome: StatusChangeOutcome::Applied { status },
            })
            .collect()
    }

    async fn restore(&self, written: &[Task]) -> HashSet<TaskId> {
        let mut restored = HashSet::new();
        for original in written {
            match self.tasks.update(original).await {
                Ok(()) => {
                    restored.insert(original.id());
                }
                Err(err) => warn!(task = %original.id(), %err, "failed to restore task status"),
            }
        }
        restored
    }

    async fn evaluate(
        &self,
        task_id: TaskId,
        status: TaskStatus,
        ignore_dependency_rules: bool,
    ) -> DependencyServiceResult<Evaluation> {
        let Some(task) = self.tasks.find_by_id(task_id).await? else {
            return Ok(Evaluation::Rejected(StatusChangeOutcome::NotFound));
        };
        match self
            .gate
            .authorize_task(&task, status, ignore_dependency_rules)
            .await?
        {
            Authorization::Allowed => Ok(Evaluation::Authorized(task)),
            Authorization::Denied { blockers } => {
                warn!(task = %task_id, %status, blockers = blockers.len(), "transition denied");
                Ok(Evaluation::Rejected(StatusChangeOutcome::Denied { blockers }))
            }
        }
    }
}

fn failed(task_id: TaskId, err: &DependencyServiceError) -> StatusChangeOutcome {
    warn!(task = %task_id, %err, "status change failed");
    StatusChangeOutcome::Failed {
        reason: err.to_string(),
    }
}
