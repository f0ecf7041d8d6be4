//! Cycle detection for candidate dependency edges.

use crate::dependency::{
    domain::TaskId,
    ports::{EdgeStore, EdgeStoreResult},
};
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;
use tracing::debug;

/// Decides whether a candidate edge would close a cycle in the stored graph.
///
/// The guard never writes. Adjacency is fetched from the edge store one node
/// at a time as the traversal advances.
#[derive(Clone)]
pub struct CycleGuard<E>
where
    E: EdgeStore,
{
    edges: Arc<E>,
}

impl<E> CycleGuard<E>
where
    E: EdgeStore,
{
    /// Creates a guard reading from the given edge store.
    #[must_use]
    pub const fn new(edges: Arc<E>) -> Self {
        Self { edges }
    }

    /// Returns `true` when adding `blocking -> blocked` would create a cycle.
    ///
    /// A self-edge always counts as a cycle. Otherwise the guard walks
    /// forward from `blocked`; reaching `blocking` means `blocking` is
    /// already transitively blocked by `blocked`.
    ///
    /// # Errors
    ///
    /// Returns edge store errors raised while fetching adjacency.
    pub async fn would_create_cycle(
        &self,
        blocking: TaskId,
        blocked: TaskId,
    ) -> EdgeStoreResult<bool> {
        if blocking == blocked {
            return Ok(true);
        }

        // Visited set also protects against cycles left behind by older data.
        let mut visited = HashSet::from([blocked]);
        let mut frontier = VecDeque::from([blocked]);
        while let Some(current) = frontier.pop_front() {
            for edge in self.edges.find_by_blocking(current).await? {
                let next = edge.blocked();
                if next == blocking {
                    debug!(%blocking, %blocked, visited = visited.len(), "cycle path found");
                    return Ok(true);
                }
                if visited.insert(next) {
                    frontier.push_back(next);
                }
            }
        }

        debug!(%blocking, %blocked, visited = visited.len(), "no cycle path");
        Ok(false)
    }
}
