//! Diesel schema for task and dependency persistence.

diesel::table! {
    /// Task rows read and status-updated by the dependency engine.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Human-readable label.
        #[max_length = 255]
        label -> Varchar,
        /// Workflow status in snake_case storage form.
        #[max_length = 50]
        status -> Varchar,
        /// Planned effort in minutes.
        planned_minutes -> Nullable<Int4>,
        /// Actual effort in minutes.
        actual_minutes -> Nullable<Int4>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed blocking edges between tasks.
    task_dependencies (id) {
        /// Edge identifier.
        id -> Uuid,
        /// Task that must reach `done` first.
        blocking_task_id -> Uuid,
        /// Task held back by the blocking task.
        blocked_task_id -> Uuid,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}

diesel::allow_tables_to_appear_in_same_query!(tasks, task_dependencies);
