//! Diesel row models and row/domain conversions.

use super::schema::{task_dependencies, tasks};
use crate::dependency::{
    domain::{
        BlockingPair, DependencyEdge, DependencyId, PersistedTaskData, Task, TaskId, TaskLabel,
        TaskStatus,
    },
    ports::{EdgeStoreError, EdgeStoreResult, TaskStoreError, TaskStoreResult},
};
use chrono::{DateTime, Utc};
use diesel::prelude::*;

/// Query result row for task records.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = tasks)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct TaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Human-readable label.
    pub label: String,
    /// Workflow status.
    pub status: String,
    /// Planned effort in minutes.
    pub planned_minutes: Option<i32>,
    /// Actual effort in minutes.
    pub actual_minutes: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for task records.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = tasks)]
pub struct NewTaskRow {
    /// Task identifier.
    pub id: uuid::Uuid,
    /// Human-readable label.
    pub label: String,
    /// Workflow status.
    pub status: String,
    /// Planned effort in minutes.
    pub planned_minutes: Option<i32>,
    /// Actual effort in minutes.
    pub actual_minutes: Option<i32>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Query result row for dependency edges.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = task_dependencies)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct DependencyRow {
    /// Edge identifier.
    pub id: uuid::Uuid,
    /// Blocking task identifier.
    pub blocking_task_id: uuid::Uuid,
    /// Blocked task identifier.
    pub blocked_task_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

/// Insert model for dependency edges.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = task_dependencies)]
pub struct NewDependencyRow {
    /// Edge identifier.
    pub id: uuid::Uuid,
    /// Blocking task identifier.
    pub blocking_task_id: uuid::Uuid,
    /// Blocked task identifier.
    pub blocked_task_id: uuid::Uuid,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
}

pub(crate) fn to_new_task_row(task: &Task) -> TaskStoreResult<NewTaskRow> {
    Ok(NewTaskRow {
        id: task.id().into_inner(),
        label: task.label().as_str().to_owned(),
        status: task.status().as_str().to_owned(),
        planned_minutes: minutes_to_column(task.planned_minutes())?,
        actual_minutes: minutes_to_column(task.actual_minutes())?,
        created_at: task.created_at(),
        updated_at: task.updated_at(),
    })
}

pub(crate) fn row_to_task(row: TaskRow) -> TaskStoreResult<Task> {
    let TaskRow {
        id,
        label,
        status,
        planned_minutes,
        actual_minutes,
        created_at,
        updated_at,
    } = row;

    let data = PersistedTaskData {
        id: TaskId::from_uuid(id),
        label: TaskLabel::new(label).map_err(TaskStoreError::persistence)?,
        status: TaskStatus::try_from(status.as_str()).map_err(TaskStoreError::persistence)?,
        planned_minutes: column_to_minutes(planned_minutes)?,
        actual_minutes: column_to_minutes(actual_minutes)?,
        created_at,
        updated_at,
    };
    Ok(Task::from_persisted(data))
}

pub(crate) const fn to_new_dependency_row(edge: &DependencyEdge) -> NewDependencyRow {
    NewDependencyRow {
        id: edge.id().into_inner(),
        blocking_task_id: edge.blocking().into_inner(),
        blocked_task_id: edge.blocked().into_inner(),
        created_at: edge.created_at(),
        updated_at: edge.updated_at(),
    }
}

pub(crate) fn row_to_edge(row: DependencyRow) -> EdgeStoreResult<DependencyEdge> {
    let pair = BlockingPair::new(
        TaskId::from_uuid(row.blocking_task_id),
        TaskId::from_uuid(row.blocked_task_id),
    )
    .map_err(EdgeStoreError::persistence)?;
    Ok(DependencyEdge::from_persisted(
        DependencyId::from_uuid(row.id),
        pair,
        row.created_at,
        row.updated_at,
    ))
}

fn minutes_to_column(minutes: Option<u32>) -> TaskStoreResult<Option<i32>> {
    minutes
        .map(i32::try_from)
        .transpose()
        .map_err(TaskStoreError::persistence)
}

fn column_to_minutes(column: Option<i32>) -> TaskStoreResult<Option<u32>> {
    column
        .map(u32::try_from)
        .transpose()
        .map_err(TaskStoreError::persistence)
}
