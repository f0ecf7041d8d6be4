//! Domain model for the task dependency graph.
//!
//! Tasks are referenced by identity only; edges are ordered
//! `(blocking, blocked)` pairs. Nothing here touches infrastructure.

mod edge;
mod error;
mod ids;
mod task;
mod transition;
mod view;

pub use edge::{BlockingPair, DependencyEdge};
pub use error::{DependencyDomainError, ParseTaskStatusError};
pub use ids::{DependencyId, TaskId, TaskLabel};
pub use task::{PersistedTaskData, Task, TaskStatus};
pub use transition::{Authorization, StatusChangeOutcome, TaskStatusResult};
pub use view::{DependencyLink, DependencyRecord, EdgeReconciliation, TaskDependencies};
