//! Task dependency graph and status-transition consistency.
//!
//! Tasks block one another through directed edges. The module keeps the
//! edge set free of self-edges, duplicates, and cycles, and refuses to move
//! a task into `InProgress` or `Done` while any of its blockers is unfinished
//! (unless the caller explicitly overrides the rule). It follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;
