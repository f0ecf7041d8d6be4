//! Creation, replacement, lookup, and removal of dependency edges.

use super::{
    CycleGuard, DependencyConfig, DependencyServiceError, DependencyServiceResult,
    DuplicateEdgePolicy, GraphLock,
};
use crate::dependency::{
    domain::{
        BlockingPair, DependencyEdge, DependencyId, DependencyLink, DependencyRecord,
        EdgeReconciliation, Task, TaskDependencies, TaskId,
    },
    ports::{EdgeStore, TaskStore},
};
use mockable::Clock;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{info, warn};

/// Request payload for creating a single dependency edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreateDependencyRequest {
    blocking_task_id: TaskId,
    blocked_task_id: TaskId,
}

impl CreateDependencyRequest {
    /// Creates a request for `blocking -> blocked`.
    #[must_use]
    pub const fn new(blocking_task_id: TaskId, blocked_task_id: TaskId) -> Self {
        Self {
            blocking_task_id,
            blocked_task_id,
        }
    }
}

/// Request payload declaring the complete outgoing edge set of a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplaceDependenciesRequest {
    task_id: TaskId,
    blocked_task_ids: Vec<TaskId>,
}

impl ReplaceDependenciesRequest {
    /// Creates a request. An empty `blocked_task_ids` clears every outgoing
    /// edge of `task_id`.
    #[must_use]
    pub fn new(task_id: TaskId, blocked_task_ids: impl IntoIterator<Item = TaskId>) -> Self {
        Self {
            task_id,
            blocked_task_ids: blocked_task_ids.into_iter().collect(),
        }
    }
}

/// Dependency graph orchestration service.
///
/// Every mutation runs its validation and write while holding the shared
/// [`GraphLock`], so concurrent callers cannot jointly commit a cycle.
#[derive(Clone)]
pub struct DependencyManager<T, E, C>
where
    T: TaskStore,
    E: EdgeStore,
    C: Clock + Send + Sync,
{
    tasks: Arc<T>,
    edges: Arc<E>,
    guard: CycleGuard<E>,
    clock: Arc<C>,
    lock: GraphLock,
    config: DependencyConfig,
}

impl<T, E, C> DependencyManager<T, E, C>
where
    T: TaskStore,
    E: EdgeStore,
    C: Clock + Send + Sync,
{
    /// Creates a manager with the default configuration.
    #[must_use]
    pub fn new(tasks: Arc<T>, edges: Arc<E>, clock: Arc<C>, lock: GraphLock) -> Self {
        let guard = CycleGuard::new(Arc::clone(&edges));
        Self {
            tasks,
            edges,
            guard,
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

    async fn find_task_or_error(&self, task_id: TaskId) -> DependencyServiceResult<Task> {
        self.tasks
            .find_by_id(task_id)
            .await?
            .ok_or(DependencyServiceError::TaskNotFound(task_id))
    }

    /// Creates the edge `blocking -> blocked`.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::TaskNotFound`] when either task is
    /// missing, a self-dependency domain error,
    /// [`DependencyServiceError::DuplicateDependency`] when the edge exists
    /// and duplicates are rejected, [`DependencyServiceError::CycleDetected`]
    /// when the edge would close a cycle, or store errors.
    pub async fn create_dependency(
        &self,
        request: CreateDependencyRequest,
    ) -> DependencyServiceResult<DependencyRecord> {
        let CreateDependencyRequest {
            blocking_task_id,
            blocked_task_id,
        } = request;
        ensure_present(blocking_task_id, "blocking task")?;
        ensure_present(blocked_task_id, "blocked task")?;

        let _guard = self.lock.acquire().await?;
        let blocking = self.find_task_or_error(blocking_task_id).await?;
        let blocked = self.find_task_or_error(blocked_task_id).await?;
        let pair = BlockingPair::new(blocking_task_id, blocked_task_id).inspect_err(|_| {
            warn!(task = %blocking_task_id, "rejected self-dependency");
        })?;

        if let Some(existing) = self.edges.find_by_pair(pair).await? {
            return match self.config.duplicate_edges {
                DuplicateEdgePolicy::Reject => {
                    warn!(%pair, "rejected duplicate dependency");
                    Err(DependencyServiceError::DuplicateDependency(pair))
                }
                DuplicateEdgePolicy::ReturnExisting => {
                    Ok(DependencyRecord::new(&existing, &blocking, &blocked))
                }
            };
        }

        if self
            .guard
            .would_create_cycle(pair.blocking(), pair.blocked())
            .await?
        {
            warn!(%pair, "rejected dependency that would create a cycle");
            return Err(DependencyServiceError::CycleDetected(pair));
        }

        let edge = DependencyEdge::new(pair, &*self.clock);
        self.edges.insert(&edge).await?;
        info!(%pair, dependency = %edge.id(), "dependency created");
        Ok(DependencyRecord::new(&edge, &blocking, &blocked))
    }

    /// Reconciles the outgoing edges of a task against a declared set.
    ///
    /// Every addition starts at `task_id`, and a cycle search for it stops
    /// on reaching `task_id`, so the edges being removed never affect the
    /// outcome. If any addition fails, nothing is written.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::TaskNotFound`] when any referenced
    /// task is missing, a self-dependency domain error when the set names
    /// the task itself, [`DependencyServiceError::CycleDetected`] for the
    /// first addition that would close a cycle, or store errors.
    pub async fn replace_outgoing(
        &self,
        request: ReplaceDependenciesRequest,
    ) -> DependencyServiceResult<EdgeReconciliation> {
        let ReplaceDependenciesRequest {
            task_id,
            blocked_task_ids,
        } = request;
        ensure_present(task_id, "task")?;
        for blocked in &blocked_task_ids {
            ensure_present(*blocked, "blocked task")?;
        }

        let mut seen = HashSet::new();
        let desired: Vec<TaskId> = blocked_task_ids
            .into_iter()
            .filter(|id| seen.insert(*id))
            .collect();
        let pairs = desired
            .iter()
            .map(|blocked| BlockingPair::new(task_id, *blocked))
            .collect::<Result<Vec<_>, _>>()?;

        let _guard = self.lock.acquire().await?;
        self.find_task_or_error(task_id).await?;
        self.ensure_all_exist(&desired).await?;

        let current = self.edges.find_by_blocking(task_id).await?;
        let current_targets: HashSet<TaskId> =
            current.iter().map(DependencyEdge::blocked).collect();
        let (kept, removed): (Vec<_>, Vec<_>) = current
            .into_iter()
            .partition(|edge| seen.contains(&edge.blocked()));

        let mut added = Vec::new();
        for pair in pairs
            .into_iter()
            .filter(|pair| !current_targets.contains(&pair.blocked()))
        {
            if self
                .guard
                .would_create_cycle(pair.blocking(), pair.blocked())
                .await?
            {
                warn!(%pair, "rejected outgoing set that would create a cycle");
                return Err(DependencyServiceError::CycleDetected(pair));
            }
            added.push(DependencyEdge::new(pair, &*self.clock));
        }

        let reconciliation = EdgeReconciliation { added, removed };
        if reconciliation.is_empty() {
            return Ok(reconciliation);
        }

        let removal_ids: Vec<DependencyId> = reconciliation
            .removed
            .iter()
            .map(DependencyEdge::id)
            .collect();
        self.edges
            .reconcile(&removal_ids, &reconciliation.added)
            .await?;
        info!(
            task = %task_id,
            added = reconciliation.added.len(),
            removed = reconciliation.removed.len(),
            kept = kept.len(),
            "outgoing dependencies replaced"
        );
        Ok(reconciliation)
    }

    async fn ensure_all_exist(&self, task_ids: &[TaskId]) -> DependencyServiceResult<()> {
        if task_ids.is_empty() {
            return Ok(());
        }
        let found: HashSet<TaskId> = self
            .tasks
            .find_by_ids(task_ids)
            .await?
            .iter()
            .map(Task::id)
            .collect();
        match task_ids.iter().find(|id| !found.contains(id)) {
            Some(missing) => Err(DependencyServiceError::TaskNotFound(*missing)),
            None => Ok(()),
        }
    }

    /// Returns the direct edges of a task in both directions.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::TaskNotFound`] when the task is
    /// missing, or store errors.
    pub async fn get_dependencies(
        &self,
        task_id: TaskId,
    ) -> DependencyServiceResult<TaskDependencies> {
        let task = self.find_task_or_error(task_id).await?;
        let blocks = self.edges.find_by_blocking(task_id).await?;
        let blocked_by = self.edges.find_by_blocked(task_id).await?;

        let neighbour_ids: Vec<TaskId> = blocks
            .iter()
            .map(DependencyEdge::blocked)
            .chain(blocked_by.iter().map(DependencyEdge::blocking))
            .collect();
        let neighbours: HashMap<TaskId, Task> = self
            .tasks
            .find_by_ids(&neighbour_ids)
            .await?
            .into_iter()
            .map(|neighbour| (neighbour.id(), neighbour))
            .collect();

        Ok(TaskDependencies {
            task_id,
            task_label: task.label().clone(),
            blocks: links(&blocks, &neighbours, DependencyEdge::blocked),
            blocked_by: links(&blocked_by, &neighbours, DependencyEdge::blocking),
        })
    }

    /// Returns a single edge with both task labels resolved.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::DependencyNotFound`] when the edge is
    /// missing, [`DependencyServiceError::TaskNotFound`] when it references a
    /// missing task, or store errors.
    pub async fn get_dependency(
        &self,
        dependency_id: DependencyId,
    ) -> DependencyServiceResult<DependencyRecord> {
        let edge = self
            .edges
            .find_by_id(dependency_id)
            .await?
            .ok_or(DependencyServiceError::DependencyNotFound(dependency_id))?;
        let blocking = self.find_task_or_error(edge.blocking()).await?;
        let blocked = self.find_task_or_error(edge.blocked()).await?;
        Ok(DependencyRecord::new(&edge, &blocking, &blocked))
    }

    /// Removes the edge `blocking -> blocked`. Other edges are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::PairNotFound`] when no such edge
    /// exists, or store errors.
    pub async fn remove_dependency(
        &self,
        blocking: TaskId,
        blocked: TaskId,
    ) -> DependencyServiceResult<DependencyEdge> {
        let not_found = DependencyServiceError::PairNotFound { blocking, blocked };
        let Ok(pair) = BlockingPair::new(blocking, blocked) else {
            return Err(not_found);
        };

        let _guard = self.lock.acquire().await?;
        let removed = self.edges.delete_by_pair(pair).await?.ok_or(not_found)?;
        info!(%pair, dependency = %removed.id(), "dependency removed");
        Ok(removed)
    }

    /// Removes an edge by identifier. Other edges are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyServiceError::DependencyNotFound`] when no such
    /// edge exists, or store errors.
    pub async fn remove_dependency_by_id(
        &self,
        dependency_id: DependencyId,
    ) -> DependencyServiceResult<DependencyEdge> {
        ensure_present_edge(dependency_id)?;
        let _guard = self.lock.acquire().await?;
        let removed = self
            .edges
            .delete_by_id(dependency_id)
            .await?
            .ok_or(DependencyServiceError::DependencyNotFound(dependency_id))?;
        info!(pair = %removed.pair(), dependency = %dependency_id, "dependency removed");
        Ok(removed)
    }
}

/// Rejects nil task identifiers as missing input.
pub(super) const fn ensure_present(
    task_id: TaskId,
    field: &'static str,
) -> DependencyServiceResult<()> {
    if task_id.is_nil() {
        return Err(DependencyServiceError::MissingIdentifier(field));
    }
    Ok(())
}

const fn ensure_present_edge(dependency_id: DependencyId) -> DependencyServiceResult<()> {
    if dependency_id.is_nil() {
        return Err(DependencyServiceError::MissingIdentifier("dependency"));
    }
    Ok(())
}

/// Builds links for `edges`. An edge whose neighbour record is missing is
/// skipped and logged.
fn links(
    edges: &[DependencyEdge],
    neighbours: &HashMap<TaskId, Task>,
    neighbour_of: fn(&DependencyEdge) -> TaskId,
) -> Vec<DependencyLink> {
    edges
        .iter()
        .filter_map(|edge| {
            let neighbour_id = neighbour_of(edge);
            let Some(neighbour) = neighbours.get(&neighbour_id) else {
                warn!(
                    dependency = %edge.id(),
                    pair = %edge.pair(),
                    missing = %neighbour_id,
                    "skipping dependency whose task record is missing"
                );
                return None;
            };
            Some(DependencyLink::new(edge, neighbour))
        })
        .collect()
}
