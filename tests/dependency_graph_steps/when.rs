//! When steps for dependency graph BDD scenarios.

use super::world::{DependencyWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskgate::dependency::services::{
    BulkStatusRequest, CreateDependencyRequest, ReplaceDependenciesRequest, TransitionTaskRequest,
};

#[when(r#""{label}" is moved to "{status}""#)]
fn task_is_moved(
    world: &mut DependencyWorld,
    label: String,
    status: String,
) -> Result<(), eyre::Report> {
    let request = TransitionTaskRequest::new(world.task_id(&label)?, status);
    world.last_transition = Some(run_async(world.orchestrator.transition_task(request)));
    Ok(())
}

#[when(r#""{blocking}" is made to block "{blocked}""#)]
fn task_is_made_to_block(
    world: &mut DependencyWorld,
    blocking: String,
    blocked: String,
) -> Result<(), eyre::Report> {
    let request = CreateDependencyRequest::new(world.task_id(&blocking)?, world.task_id(&blocked)?);
    world.last_dependency = Some(run_async(world.manager.create_dependency(request)));
    Ok(())
}

#[when(r#"the dependencies of "{label}" are replaced with "{target}""#)]
fn dependencies_are_replaced(
    world: &mut DependencyWorld,
    label: String,
    target: String,
) -> Result<(), eyre::Report> {
    let task_id = world.task_id(&label)?;
    let request = ReplaceDependenciesRequest::new(task_id, [world.task_id(&target)?]);
    run_async(world.manager.replace_outgoing(request)).wrap_err("replace outgoing set")?;
    Ok(())
}

#[when(r#""{first}" and "{second}" are moved to "{status}" together"#)]
fn tasks_are_moved_together(
    world: &mut DependencyWorld,
    first: String,
    second: String,
    status: String,
) -> Result<(), eyre::Report> {
    let request =
        BulkStatusRequest::new([world.task_id(&first)?, world.task_id(&second)?], status);
    world.last_bulk =
        run_async(world.orchestrator.apply(request)).wrap_err("apply bulk status change")?;
    Ok(())
}
