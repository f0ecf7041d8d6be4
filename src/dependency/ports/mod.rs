//! Port contracts for the dependency engine.
//!
//! Ports define infrastructure-agnostic interfaces used by dependency
//! services.

pub mod edge_store;
pub mod graph_fence;
pub mod task_store;

pub use edge_store::{EdgeStore, EdgeStoreError, EdgeStoreResult};
pub use graph_fence::{FenceGuard, GraphFence, GraphFenceError, GraphFenceResult};
pub use task_store::{TaskStore, TaskStoreError, TaskStoreResult};
