//! Edge store port for dependency edge persistence and adjacency lookups.
//!
//! The graph lives in the store as flat rows. Services materialize
//! adjacency on demand through [`EdgeStore::find_by_blocking`] and
//! [`EdgeStore::find_by_blocked`]; no in-process graph is assumed.

use crate::dependency::domain::{BlockingPair, DependencyEdge, DependencyId, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for edge store operations.
pub type EdgeStoreResult<T> = Result<T, EdgeStoreError>;

/// Dependency edge persistence contract.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EdgeStore: Send + Sync {
    /// Inserts a new edge.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeStoreError::DuplicateEdge`] when an edge with the same
    /// `(blocking, blocked)` pair already exists, or
    /// [`EdgeStoreError::DuplicateId`] when the edge ID is taken.
    async fn insert(&self, edge: &DependencyEdge) -> EdgeStoreResult<()>;

    /// Finds an edge by identifier. The edge carries both task references.
    async fn find_by_id(&self, id: DependencyId) -> EdgeStoreResult<Option<DependencyEdge>>;

    /// Finds the edge for an exact `(blocking, blocked)` pair.
    async fn find_by_pair(&self, pair: BlockingPair) -> EdgeStoreResult<Option<DependencyEdge>>;

    /// Returns every edge whose blocking side is `task_id`.
    async fn find_by_blocking(&self, task_id: TaskId) -> EdgeStoreResult<Vec<DependencyEdge>>;

    /// Returns every edge whose blocked side is `task_id`.
    async fn find_by_blocked(&self, task_id: TaskId) -> EdgeStoreResult<Vec<DependencyEdge>>;

    /// Deletes an edge by identifier, returning it if it existed.
    async fn delete_by_id(&self, id: DependencyId) -> EdgeStoreResult<Option<DependencyEdge>>;

    /// Deletes the edge for a pair, returning it if it existed.
    async fn delete_by_pair(&self, pair: BlockingPair) -> EdgeStoreResult<Option<DependencyEdge>>;

    /// Deletes `removals` and inserts `additions` as one atomic change.
    ///
    /// # Errors
    ///
    /// Returns [`EdgeStoreError::DuplicateEdge`] when an addition collides
    /// with an edge that survives the removals. On any error the store is
    /// left unchanged.
    async fn reconcile(
        &self,
        removals: &[DependencyId],
        additions: &[DependencyEdge],
    ) -> EdgeStoreResult<()>;
}

/// Errors returned by edge store implementations.
#[derive(Debug, Clone, Error)]
pub enum EdgeStoreError {
    /// An edge for the pair already exists.
    #[error("duplicate dependency: {0}")]
    DuplicateEdge(BlockingPair),

    /// An edge with the same identifier already exists.
    #[error("duplicate dependency identifier: {0}")]
    DuplicateId(DependencyId),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl EdgeStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
