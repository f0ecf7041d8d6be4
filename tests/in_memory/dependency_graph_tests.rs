//! Dependency graph workflows through the public service API.

use crate::in_memory::helpers::{Engine, engine};
use eyre::ensure;
use rstest::rstest;
use taskgate::dependency::services::{
    CreateDependencyRequest, DependencyErrorKind, DependencyServiceError,
    ReplaceDependenciesRequest,
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn release_plan_rejects_backward_edge(engine: Engine) -> eyre::Result<()> {
    let design = engine.add_task("Design").await?;
    let build = engine.add_task("Build").await?;
    let test = engine.add_task("Test").await?;
    let release = engine.add_task("Release").await?;

    for (blocking, blocked) in [(design, build), (build, test), (test, release)] {
        engine
            .manager
            .create_dependency(CreateDependencyRequest::new(blocking, blocked))
            .await?;
    }

    let backward = engine
        .manager
        .create_dependency(CreateDependencyRequest::new(release, design))
        .await;
    let Err(err) = backward else {
        eyre::bail!("backward edge should have been rejected");
    };
    ensure!(matches!(err, DependencyServiceError::CycleDetected(_)));
    ensure!(err.kind() == DependencyErrorKind::Conflict);

    // A shortcut in the forward direction is fine.
    engine
        .manager
        .create_dependency(CreateDependencyRequest::new(design, release))
        .await?;
    let release_view = engine.manager.get_dependencies(release).await?;
    ensure!(release_view.blocked_by.len() == 2);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn views_serialize_with_labels(engine: Engine) -> eyre::Result<()> {
    let design = engine.add_task("Design").await?;
    let build = engine.add_task("Build").await?;
    engine
        .manager
        .create_dependency(CreateDependencyRequest::new(design, build))
        .await?;

    let view = engine.manager.get_dependencies(build).await?;
    let json = serde_json::to_value(&view)?;

    ensure!(json["task_label"] == "Build");
    ensure!(json["blocks"].as_array().is_some_and(Vec::is_empty));
    ensure!(json["blocked_by"][0]["task_label"] == "Design");
    ensure!(json["blocked_by"][0]["task_status"] == "todo");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn replacing_outgoing_set_leaves_other_tasks_alone(engine: Engine) -> eyre::Result<()> {
    let lead = engine.add_task("Lead").await?;
    let first = engine.add_task("First").await?;
    let second = engine.add_task("Second").await?;
    let other = engine.add_task("Other").await?;
    engine
        .manager
        .create_dependency(CreateDependencyRequest::new(other, first))
        .await?;
    engine
        .manager
        .replace_outgoing(ReplaceDependenciesRequest::new(lead, [first]))
        .await?;

    let reconciliation = engine
        .manager
        .replace_outgoing(ReplaceDependenciesRequest::new(lead, [second]))
        .await?;

    ensure!(reconciliation.added.len() == 1);
    ensure!(reconciliation.removed.len() == 1);
    let first_view = engine.manager.get_dependencies(first).await?;
    ensure!(first_view.blocked_by_ids() == vec![other]);
    ensure!(engine.manager.get_dependencies(lead).await?.blocks_ids() == vec![second]);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn removal_by_pair_and_by_id_agree(engine: Engine) -> eyre::Result<()> {
    let a = engine.add_task("A").await?;
    let b = engine.add_task("B").await?;
    let record = engine
        .manager
        .create_dependency(CreateDependencyRequest::new(a, b))
        .await?;

    let removed = engine.manager.remove_dependency(a, b).await?;
    ensure!(removed.id() == record.id);

    let second_removal = engine.manager.remove_dependency_by_id(record.id).await;
    ensure!(matches!(
        second_removal,
        Err(DependencyServiceError::DependencyNotFound(id)) if id == record.id
    ));
    Ok(())
}
