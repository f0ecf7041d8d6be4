//! In-memory adapter implementations.
//!
//! These adapters provide simple, thread-safe stores suitable for tests and
//! for embedding the engine without a database.

mod edge;
mod task;

pub use edge::InMemoryEdgeStore;
pub use task::InMemoryTaskStore;
