//! Taskgate: dependency graph and status-transition consistency for tasks.
//!
//! This crate keeps the "blocks" relationship between tasks acyclic and
//! refuses status changes that would let a task start or finish before the
//! tasks blocking it are done. It is meant to be embedded in a larger
//! project-management backend that owns the tasks themselves.
//!
//! # Architecture
//!
//! Taskgate follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for task and edge persistence
//! - **Adapters**: In-memory and `PostgreSQL` implementations of the ports
//! - **Services**: Cycle guard, dependency manager, transition gate, and
//!   bulk status orchestrator
//!
//! # Modules
//!
//! - [`dependency`]: Dependency edges, cycle prevention, and status gating

pub mod dependency;
