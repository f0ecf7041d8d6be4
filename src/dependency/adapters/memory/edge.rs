//! In-memory edge store with adjacency indexes in both directions.

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};

use crate::dependency::{
    domain::{BlockingPair, DependencyEdge, DependencyId, TaskId},
    ports::{EdgeStore, EdgeStoreError, EdgeStoreResult},
};

/// Thread-safe in-memory edge store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryEdgeStore {
    state: Arc<RwLock<InMemoryEdgeState>>,
}

#[derive(Debug, Default)]
struct InMemoryEdgeState {
    edges: HashMap<DependencyId, DependencyEdge>,
    pair_index: HashMap<BlockingPair, DependencyId>,
    blocking_index: HashMap<TaskId, Vec<DependencyId>>,
    blocked_index: HashMap<TaskId, Vec<DependencyId>>,
}

impl InMemoryEdgeStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl InMemoryEdgeState {
    fn add(&mut self, edge: &DependencyEdge) {
        self.pair_index.insert(edge.pair(), edge.id());
        self.blocking_index
            .entry(edge.blocking())
            .or_default()
            .push(edge.id());
        self.blocked_index
            .entry(edge.blocked())
            .or_default()
            .push(edge.id());
        self.edges.insert(edge.id(), edge.clone());
    }

    fn remove(&mut self, id: DependencyId) -> Option<DependencyEdge> {
        let edge = self.edges.remove(&id)?;
        self.pair_index.remove(&edge.pair());
        remove_from_index(&mut self.blocking_index, edge.blocking(), id);
        remove_from_index(&mut self.blocked_index, edge.blocked(), id);
        Some(edge)
    }

    fn edges_in(
        &self,
        index: &HashMap<TaskId, Vec<DependencyId>>,
        task_id: TaskId,
    ) -> Vec<DependencyEdge> {
        index
            .get(&task_id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.edges.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Checks that `additions` can be inserted once `removals` are gone.
    fn check_additions(
        &self,
        removals: &HashSet<DependencyId>,
        additions: &[DependencyEdge],
    ) -> EdgeStoreResult<()> {
        let mut pending_pairs = HashSet::new();
        let mut pending_ids = HashSet::new();
        for edge in additions {
            let id_taken = self.edges.contains_key(&edge.id()) && !removals.contains(&edge.id());
            if id_taken || !pending_ids.insert(edge.id()) {
                return Err(EdgeStoreError::DuplicateId(edge.id()));
            }
            let pair_taken = self
                .pair_index
                .get(&edge.pair())
                .is_some_and(|existing| !removals.contains(existing));
            if pair_taken || !pending_pairs.insert(edge.pair()) {
                return Err(EdgeStoreError::DuplicateEdge(edge.pair()));
            }
        }
        Ok(())
    }
}

/// Removes an edge ID from an adjacency index, cleaning up the entry if empty.
fn remove_from_index(
    index: &mut HashMap<TaskId, Vec<DependencyId>>,
    task_id: TaskId,
    id: DependencyId,
) {
    if let Some(ids) = index.get_mut(&task_id) {
        ids.retain(|existing| *existing != id);
        if ids.is_empty() {
            index.remove(&task_id);
        }
    }
}

fn poisoned(err: impl std::fmt::Display) -> EdgeStoreError {
    EdgeStoreError::persistence(std::io::Error::other(err.to_string()))
}

#[async_trait]
impl EdgeStore for InMemoryEdgeStore {
    async fn insert(&self, edge: &DependencyEdge) -> EdgeStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        state.check_additions(&HashSet::new(), std::slice::from_ref(edge))?;
        state.add(edge);
        Ok(())
    }

    async fn find_by_id(&self, id: DependencyId) -> EdgeStoreResult<Option<DependencyEdge>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.edges.get(&id).cloned())
    }

    async fn find_by_pair(&self, pair: BlockingPair) -> EdgeStoreResult<Option<DependencyEdge>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state
            .pair_index
            .get(&pair)
            .and_then(|id| state.edges.get(id))
            .cloned())
    }

    async fn find_by_blocking(&self, task_id: TaskId) -> EdgeStoreResult<Vec<DependencyEdge>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.edges_in(&state.blocking_index, task_id))
    }

    async fn find_by_blocked(&self, task_id: TaskId) -> EdgeStoreResult<Vec<DependencyEdge>> {
        let state = self.state.read().map_err(poisoned)?;
        Ok(state.edges_in(&state.blocked_index, task_id))
    }

    async fn delete_by_id(&self, id: DependencyId) -> EdgeStoreResult<Option<DependencyEdge>> {
        let mut state = self.state.write().map_err(poisoned)?;
        Ok(state.remove(id))
    }

    async fn delete_by_pair(&self, pair: BlockingPair) -> EdgeStoreResult<Option<DependencyEdge>> {
        let mut state = self.state.write().map_err(poisoned)?;
        let Some(id) = state.pair_index.get(&pair).copied() else {
            return Ok(None);
        };
        Ok(state.remove(id))
    }

    async fn reconcile(
        &self,
        removals: &[DependencyId],
        additions: &[DependencyEdge],
    ) -> EdgeStoreResult<()> {
        let mut state = self.state.write().map_err(poisoned)?;
        let removal_set: HashSet<DependencyId> = removals.iter().copied().collect();
        state.check_additions(&removal_set, additions)?;
        for id in removal_set {
            state.remove(id);
        }
        for edge in additions {
            state.add(edge);
        }
        Ok(())
    }
}
