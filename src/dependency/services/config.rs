//! Policy configuration for dependency services.

use serde::{Deserialize, Serialize};

/// How `create_dependency` treats an edge that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicateEdgePolicy {
    /// Fail with a conflict error.
    #[default]
    Reject,
    /// Succeed and return the stored edge unchanged.
    ReturnExisting,
}

/// How a bulk status change handles items that cannot be applied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BulkPolicy {
    /// Apply every authorized item and report failures per item.
    #[default]
    BestEffort,
    /// Apply nothing unless every item is authorized.
    AllOrNothing,
}

/// Configuration for dependency services.
///
/// Hosts usually deserialize this from their own settings file; missing
/// fields fall back to the defaults.
///
/// # Examples
///
/// ```
/// use taskgate::dependency::services::{BulkPolicy, DependencyConfig, DuplicateEdgePolicy};
///
/// let config = DependencyConfig::default();
/// assert_eq!(config.duplicate_edges, DuplicateEdgePolicy::Reject);
/// assert_eq!(config.bulk, BulkPolicy::BestEffort);
///
/// let strict = DependencyConfig::strict();
/// assert_eq!(strict.bulk, BulkPolicy::AllOrNothing);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DependencyConfig {
    /// Duplicate edge handling.
    pub duplicate_edges: DuplicateEdgePolicy,
    /// Bulk status failure policy.
    pub bulk: BulkPolicy,
}

impl DependencyConfig {
    /// Creates a lenient configuration where re-creating an edge is a no-op.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            duplicate_edges: DuplicateEdgePolicy::ReturnExisting,
            bulk: BulkPolicy::BestEffort,
        }
    }

    /// Creates a strict configuration where bulk changes are all-or-nothing.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            duplicate_edges: DuplicateEdgePolicy::Reject,
            bulk: BulkPolicy::AllOrNothing,
        }
    }

    /// Sets the duplicate edge policy.
    #[must_use]
    pub const fn with_duplicate_edges(mut self, policy: DuplicateEdgePolicy) -> Self {
        self.duplicate_edges = policy;
        self
    }

    /// Sets the bulk status policy.
    #[must_use]
    pub const fn with_bulk(mut self, policy: BulkPolicy) -> Self {
        self.bulk = policy;
        self
    }
}
