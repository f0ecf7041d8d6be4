//! Application services for the dependency graph and status gating.

mod bulk;
mod config;
mod cycle_guard;
mod error;
mod gate;
mod lock;
mod manager;

pub use bulk::{BulkStatusOrchestrator, BulkStatusRequest, TransitionTaskRequest};
pub use config::{BulkPolicy, DependencyConfig, DuplicateEdgePolicy};
pub use cycle_guard::CycleGuard;
pub use error::{DependencyErrorKind, DependencyServiceError, DependencyServiceResult};
pub use gate::StatusTransitionGate;
pub use lock::GraphLock;
pub use manager::{CreateDependencyRequest, DependencyManager, ReplaceDependenciesRequest};
