//! `PostgreSQL` adapters for task and dependency persistence.
//!
//! The schema lives in `migrations/`. Edges are plain rows; the unique
//! index on `(blocking_task_id, blocked_task_id)` backs the one-edge-per-pair
//! rule and a check constraint rejects self-edges.
//!
//! The unique index stops duplicate pairs from any number of hosts, but a
//! cycle can only be ruled out when every writer is serialized. The in-process
//! `GraphLock` does that for one host. Hosts sharing a database should attach
//! a [`PostgresGraphFence`] to their lock so the check-then-write sequences of
//! all hosts run one at a time:
//!
//! ```ignore
//! let lock = GraphLock::new().with_fence(Arc::new(PostgresGraphFence::new(pool.clone())));
//! ```

mod edge;
mod fence;
mod models;
mod schema;
mod task;

use diesel::pg::PgConnection;
use diesel::r2d2::{ConnectionManager, Pool};

pub use edge::PostgresEdgeStore;
pub use fence::{DEFAULT_GRAPH_FENCE_KEY, PostgresGraphFence};
pub use task::PostgresTaskStore;

/// `PostgreSQL` connection pool type used by dependency adapters.
pub type DependencyPgPool = Pool<ConnectionManager<PgConnection>>;
