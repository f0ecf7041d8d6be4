//! Adapter implementations for the task and edge store ports.
//!
//! - [`memory`]: thread-safe in-memory stores for tests and embedding
//! - [`postgres`]: `PostgreSQL` persistence using Diesel ORM

pub mod memory;
pub mod postgres;
