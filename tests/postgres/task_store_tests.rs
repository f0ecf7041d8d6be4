//! Task persistence and update semantics in `PostgreSQL`.

use crate::postgres::helpers::{PostgresContext, context};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use taskgate::dependency::{
    domain::{Task, TaskId, TaskLabel, TaskStatus},
    ports::{TaskStore, TaskStoreError},
};

#[rstest]
fn stored_task_round_trips(context: PostgresContext) -> eyre::Result<()> {
    let task = Task::new(TaskLabel::new("Write migration")?, &DefaultClock)
        .with_status(TaskStatus::WaitingForApproval)
        .with_planned_minutes(90);
    context.rt.block_on(context.tasks.store(&task))?;

    let found = context
        .rt
        .block_on(context.tasks.find_by_id(task.id()))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;

    ensure!(found.id() == task.id());
    ensure!(found.label().as_str() == "Write migration");
    ensure!(found.status() == TaskStatus::WaitingForApproval);
    ensure!(found.planned_minutes() == Some(90));
    ensure!(found.actual_minutes().is_none());
    Ok(())
}

#[rstest]
fn storing_the_same_task_twice_is_a_duplicate(context: PostgresContext) -> eyre::Result<()> {
    let task = Task::new(TaskLabel::new("Once")?, &DefaultClock);
    context.rt.block_on(context.tasks.store(&task))?;

    let result = context.rt.block_on(context.tasks.store(&task));

    ensure!(
        matches!(result, Err(TaskStoreError::DuplicateTask(id)) if id == task.id()),
        "expected DuplicateTask, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn update_persists_the_new_status(context: PostgresContext) -> eyre::Result<()> {
    let task_id = context.task("Ship")?;
    let mut task = context
        .rt
        .block_on(context.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;

    task.set_status(TaskStatus::InProgress, &DefaultClock);
    context.rt.block_on(context.tasks.update(&task))?;

    let reloaded = context
        .rt
        .block_on(context.tasks.find_by_id(task_id))?
        .ok_or_else(|| eyre::eyre!("task should exist"))?;
    ensure!(reloaded.status() == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
fn update_of_unknown_task_is_not_found(context: PostgresContext) -> eyre::Result<()> {
    let never_stored = Task::new(TaskLabel::new("Ghost")?, &DefaultClock);

    let result = context.rt.block_on(context.tasks.update(&never_stored));

    ensure!(
        matches!(result, Err(TaskStoreError::NotFound(id)) if id == never_stored.id()),
        "expected NotFound, got {result:?}"
    );
    Ok(())
}

#[rstest]
fn find_by_ids_skips_unknown_identifiers(context: PostgresContext) -> eyre::Result<()> {
    let a = context.task("A")?;
    let b = context.task("B")?;

    let mut found: Vec<TaskId> = context
        .rt
        .block_on(context.tasks.find_by_ids(&[a, TaskId::new(), b]))?
        .iter()
        .map(Task::id)
        .collect();
    found.sort();

    let mut expected = vec![a, b];
    expected.sort();
    ensure!(found == expected);
    Ok(())
}
