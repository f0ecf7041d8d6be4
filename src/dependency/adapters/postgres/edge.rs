//! `PostgreSQL` edge store.

use super::{
    DependencyPgPool,
    models::{DependencyRow, NewDependencyRow, row_to_edge, to_new_dependency_row},
    schema::task_dependencies,
};
use crate::dependency::{
    domain::{BlockingPair, DependencyEdge, DependencyId, TaskId},
    ports::{EdgeStore, EdgeStoreError, EdgeStoreResult},
};
use async_trait::async_trait;
use diesel::pg::PgConnection;
use diesel::prelude::*;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Unique index over `(blocking_task_id, blocked_task_id)`.
const PAIR_UNIQUE_CONSTRAINT: &str = "idx_task_dependencies_pair_unique";

/// `PostgreSQL`-backed edge store.
#[derive(Debug, Clone)]
pub struct PostgresEdgeStore {
    pool: DependencyPgPool,
}

impl PostgresEdgeStore {
    /// Creates a new store from a `PostgreSQL` connection pool.
    #[must_use]
    pub const fn new(pool: DependencyPgPool) -> Self {
        Self { pool }
    }

    async fn run_blocking<F, T>(&self, f: F) -> EdgeStoreResult<T>
    where
        F: FnOnce(&mut PgConnection) -> EdgeStoreResult<T> + Send + 'static,
        T: Send + 'static,
    {
        let pool = self.pool.clone();
        tokio::task::spawn_blocking(move || {
            let mut connection = pool.get().map_err(EdgeStoreError::persistence)?;
            f(&mut connection)
        })
        .await
        .map_err(EdgeStoreError::persistence)?
    }
}

impl From<DieselError> for EdgeStoreError {
    fn from(err: DieselError) -> Self {
        Self::persistence(err)
    }
}

#[async_trait]
impl EdgeStore for PostgresEdgeStore {
    async fn insert(&self, edge: &DependencyEdge) -> EdgeStoreResult<()> {
        let pair = edge.pair();
        let new_row = to_new_dependency_row(edge);
        self.run_blocking(move |connection| insert_row(connection, &new_row, pair))
            .await
    }

    async fn find_by_id(&self, id: DependencyId) -> EdgeStoreResult<Option<DependencyEdge>> {
        self.run_blocking(move |connection| {
            let row = task_dependencies::table
                .filter(task_dependencies::id.eq(id.into_inner()))
                .select(DependencyRow::as_select())
                .first::<DependencyRow>(connection)
                .optional()?;
            row.map(row_to_edge).transpose()
        })
        .await
    }

    async fn find_by_pair(&self, pair: BlockingPair) -> EdgeStoreResult<Option<DependencyEdge>> {
        self.run_blocking(move |connection| {
            find_row_by_pair(connection, pair)?
                .map(row_to_edge)
                .transpose()
        })
        .await
    }

    async fn find_by_blocking(&self, task_id: TaskId) -> EdgeStoreResult<Vec<DependencyEdge>> {
        self.run_blocking(move |connection| {
            let rows = task_dependencies::table
                .filter(task_dependencies::blocking_task_id.eq(task_id.into_inner()))
                .order((task_dependencies::created_at, task_dependencies::id))
                .select(DependencyRow::as_select())
                .load::<DependencyRow>(connection)?;
            rows.into_iter().map(row_to_edge).collect()
        })
        .await
    }

    async fn find_by_blocked(&self, task_id: TaskId) -> EdgeStoreResult<Vec<DependencyEdge>> {
        self.run_blocking(move |connection| {
            let rows = task_dependencies::table
                .filter(task_dependencies::blocked_task_id.eq(task_id.into_inner()))
                .order((task_dependencies::created_at, task_dependencies::id))
                .select(DependencyRow::as_select())
                .load::<DependencyRow>(connection)?;
            rows.into_iter().map(row_to_edge).collect()
        })
        .await
    }

    async fn delete_by_id(&self, id: DependencyId) -> EdgeStoreResult<Option<DependencyEdge>> {
        self.run_blocking(move |connection| {
            let row = diesel::delete(
                task_dependencies::table.filter(task_dependencies::id.eq(id.into_inner())),
            )
            .returning(DependencyRow::as_returning())
            .get_result::<DependencyRow>(connection)
            .optional()?;
            row.map(row_to_edge).transpose()
        })
        .await
    }

    async fn delete_by_pair(&self, pair: BlockingPair) -> EdgeStoreResult<Option<DependencyEdge>> {
        self.run_blocking(move |connection| {
            let row = diesel::delete(
                task_dependencies::table
                    .filter(task_dependencies::blocking_task_id.eq(pair.blocking().into_inner()))
                    .filter(task_dependencies::blocked_task_id.eq(pair.blocked().into_inner())),
            )
            .returning(DependencyRow::as_returning())
            .get_result::<DependencyRow>(connection)
            .optional()?;
            row.map(row_to_edge).transpose()
        })
        .await
    }

    async fn reconcile(
        &self,
        removals: &[DependencyId],
        additions: &[DependencyEdge],
    ) -> EdgeStoreResult<()> {
        let removal_ids: Vec<uuid::Uuid> = removals.iter().map(|id| id.into_inner()).collect();
        let new_rows: Vec<(BlockingPair, NewDependencyRow)> = additions
            .iter()
            .map(|edge| (edge.pair(), to_new_dependency_row(edge)))
            .collect();

        self.run_blocking(move |connection| {
            connection.transaction::<_, EdgeStoreError, _>(move |tx_conn| {
                if !removal_ids.is_empty() {
                    diesel::delete(
                        task_dependencies::table.filter(task_dependencies::id.eq_any(removal_ids)),
                    )
                    .execute(tx_conn)?;
                }
                for (pair, row) in &new_rows {
                    insert_row(tx_conn, row, *pair)?;
                }
                Ok(())
            })
        })
        .await
    }
}

fn insert_row(
    connection: &mut PgConnection,
    row: &NewDependencyRow,
    pair: BlockingPair,
) -> EdgeStoreResult<()> {
    diesel::insert_into(task_dependencies::table)
        .values(row)
        .execute(connection)
        .map_err(|err| match err {
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, ref info)
                if is_pair_unique_violation(info.as_ref()) =>
            {
                EdgeStoreError::DuplicateEdge(pair)
            }
            DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                EdgeStoreError::DuplicateId(DependencyId::from_uuid(row.id))
            }
            _ => EdgeStoreError::persistence(err),
        })?;
    Ok(())
}

fn find_row_by_pair(
    connection: &mut PgConnection,
    pair: BlockingPair,
) -> EdgeStoreResult<Option<DependencyRow>> {
    Ok(task_dependencies::table
        .filter(task_dependencies::blocking_task_id.eq(pair.blocking().into_inner()))
        .filter(task_dependencies::blocked_task_id.eq(pair.blocked().into_inner()))
        .select(DependencyRow::as_select())
        .first::<DependencyRow>(connection)
        .optional()?)
}

fn is_pair_unique_violation(info: &dyn DatabaseErrorInformation) -> bool {
    info.constraint_name()
        .is_some_and(|name| name == PAIR_UNIQUE_CONSTRAINT)
}
