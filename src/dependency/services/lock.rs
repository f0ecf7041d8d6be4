//! Serialization of graph and status mutations.

use crate::dependency::ports::{FenceGuard, GraphFence, GraphFenceResult};
use std::fmt;
use std::sync::Arc;
use tokio::sync::{Mutex, MutexGuard};

/// Coarse lock spanning every check-then-write sequence on the graph.
///
/// Clones share the same underlying mutex. Services that must not race each
/// other are constructed from clones of one `GraphLock`. The mutex only
/// covers this process; when several hosts write to one store, attach a
/// [`GraphFence`] with [`GraphLock::with_fence`].
#[derive(Clone, Default)]
pub struct GraphLock {
    inner: Arc<Mutex<()>>,
    fence: Option<Arc<dyn GraphFence>>,
}

impl GraphLock {
    /// Creates an unlocked graph lock.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Also enters `fence` after taking the in-process mutex. Clones taken
    /// before this call stay unfenced.
    #[must_use]
    pub fn with_fence(self, fence: Arc<dyn GraphFence>) -> Self {
        Self {
            inner: self.inner,
            fence: Some(fence),
        }
    }

    /// Waits for exclusive access to the graph.
    pub(crate) async fn acquire(&self) -> GraphFenceResult<GraphGuard<'_>> {
        let local = self.inner.lock().await;
        let fence = match &self.fence {
            Some(fence) => Some(fence.enter().await?),
            None => None,
        };
        Ok(GraphGuard {
            _fence: fence,
            _local: local,
        })
    }
}

impl fmt::Debug for GraphLock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphLock")
            .field("fenced", &self.fence.is_some())
            .finish_non_exhaustive()
    }
}

/// Held for one check-then-write sequence. The fence is left before the
/// mutex is released.
pub(crate) struct GraphGuard<'a> {
    _fence: Option<Box<dyn FenceGuard>>,
    _local: MutexGuard<'a, ()>,
}
