//! Dependency edges between tasks.

use super::{DependencyDomainError, DependencyId, TaskId};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered `(blocking, blocked)` pair of distinct tasks.
///
/// The blocking task must reach `Done` before the blocked task may advance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BlockingPair {
    blocking: TaskId,
    blocked: TaskId,
}

impl BlockingPair {
    /// Creates a validated pair.
    ///
    /// # Errors
    ///
    /// Returns [`DependencyDomainError::SelfDependency`] when both sides are
    /// the same task.
    pub fn new(blocking: TaskId, blocked: TaskId) -> Result<Self, DependencyDomainError> {
        if blocking == blocked {
            return Err(DependencyDomainError::SelfDependency(blocking));
        }
        Ok(Self { blocking, blocked })
    }

    /// Returns the task that must finish first.
    #[must_use]
    pub const fn blocking(self) -> TaskId {
        self.blocking
    }

    /// Returns the task being held back.
    #[must_use]
    pub const fn blocked(self) -> TaskId {
        self.blocked
    }
}

impl fmt::Display for BlockingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {}", self.blocking, self.blocked)
    }
}

/// A persisted blocking relationship between two tasks.
///
/// Edges are never mutated in place; replacing a task's outgoing set deletes
/// and inserts whole edges.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    id: DependencyId,
    pair: BlockingPair,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl DependencyEdge {
    /// Creates a new edge for the given pair.
    #[must_use]
    pub fn new(pair: BlockingPair, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        Self {
            id: DependencyId::new(),
            pair,
            created_at: timestamp,
            updated_at: timestamp,
        }
    }

    /// Reconstructs an edge from persisted storage.
    #[must_use]
    pub const fn from_persisted(
        id: DependencyId,
        pair: BlockingPair,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            pair,
            created_at,
            updated_at,
        }
    }

    /// Returns the edge identifier.
    #[must_use]
    pub const fn id(&self) -> DependencyId {
        self.id
    }

    /// Returns the `(blocking, blocked)` pair.
    #[must_use]
    pub const fn pair(&self) -> BlockingPair {
        self.pair
    }

    /// Returns the blocking task identifier.
    #[must_use]
    pub const fn blocking(&self) -> TaskId {
        self.pair.blocking
    }

    /// Returns the blocked task identifier.
    #[must_use]
    pub const fn blocked(&self) -> TaskId {
        self.pair.blocked
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}
