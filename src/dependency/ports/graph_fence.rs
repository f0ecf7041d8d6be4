//! Graph fence port for excluding writers in other processes.
//!
//! [`crate::dependency::services::GraphLock`] serializes mutations within one
//! process. Hosts that share a store also need a fence: while one holder is
//! inside, every other [`GraphFence::enter`] on the same graph waits.

use async_trait::async_trait;
use std::sync::Arc;
use thiserror::Error;

/// Result type for graph fence operations.
pub type GraphFenceResult<T> = Result<T, GraphFenceError>;

/// Proof of being inside the fence. Dropping it leaves the fence.
pub trait FenceGuard: Send {}

/// Exclusion shared by every process mutating the same graph.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GraphFence: Send + Sync {
    /// Waits until no other holder is inside the fence, then enters it.
    ///
    /// # Errors
    ///
    /// Returns [`GraphFenceError::Persistence`] when the fence backend
    /// cannot be reached.
    async fn enter(&self) -> GraphFenceResult<Box<dyn FenceGuard>>;
}

/// Errors returned by graph fence implementations.
#[derive(Debug, Clone, Error)]
pub enum GraphFenceError {
    /// Backend failure while entering the fence.
    #[error("graph fence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl GraphFenceError {
    /// Wraps a backend error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
