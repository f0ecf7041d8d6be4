//! Advisory-lock graph fence.

use super::DependencyPgPool;
use crate::dependency::ports::{FenceGuard, GraphFence, GraphFenceError, GraphFenceResult};
use async_trait::async_trait;
use diesel::connection::SimpleConnection;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, PooledConnection};
use diesel::sql_types::BigInt;
use tracing::warn;

/// Advisory lock key used when none is configured.
pub const DEFAULT_GRAPH_FENCE_KEY: i64 = 0x7461_736b_6761_7465;

/// Graph fence backed by a transaction-scoped `PostgreSQL` advisory lock.
///
/// Each holder keeps one pooled connection with an open transaction for as
/// long as it is inside the fence, so the pool needs one connection more
/// than the stores sharing it.
#[derive(Debug, Clone)]
pub struct PostgresGraphFence {
    pool: DependencyPgPool,
    key: i64,
}

impl PostgresGraphFence {
    /// Creates a fence on [`DEFAULT_GRAPH_FENCE_KEY`].
    #[must_use]
    pub const fn new(pool: DependencyPgPool) -> Self {
        Self::with_key(pool, DEFAULT_GRAPH_FENCE_KEY)
    }

    /// Creates a fence on a custom advisory lock key. Processes fence each
    /// other only when they use the same key on the same database.
    #[must_use]
    pub const fn with_key(pool: DependencyPgPool, key: i64) -> Self {
        Self { pool, key }
    }
}

struct AdvisoryGuard {
    connection: PooledConnection<ConnectionManager<PgConnection>>,
}

impl FenceGuard for AdvisoryGuard {}

impl Drop for AdvisoryGuard {
    fn drop(&mut self) {
        // Ending the transaction releases the advisory lock.
        if let Err(err) = self.connection.batch_execute("ROLLBACK") {
            warn!(%err, "failed to leave graph fence");
        }
    }
}

#[async_trait]
impl GraphFence for PostgresGraphFence {
    async fn enter(&self) -> GraphFenceResult<Box<dyn FenceGuard>> {
        let pool = self.pool.clone();
        let key = self.key;
        let guard = tokio::task::spawn_blocking(move || {
            let connection = pool.get().map_err(GraphFenceError::persistence)?;
            let mut guard = AdvisoryGuard { connection };
            guard
                .connection
                .batch_execute("BEGIN")
                .map_err(GraphFenceError::persistence)?;
            diesel::sql_query("SELECT pg_advisory_xact_lock($1)")
                .bind::<BigInt, _>(key)
                .execute(&mut *guard.connection)
                .map_err(GraphFenceError::persistence)?;
            Ok::<_, GraphFenceError>(guard)
        })
        .await
        .map_err(GraphFenceError::persistence)??;
        Ok(Box::new(guard))
    }
}
