//! Status changes gated by blockers, through the public service API.

use crate::in_memory::helpers::{Engine, engine};
use eyre::ensure;
use rstest::rstest;
use taskgate::dependency::{
    domain::{StatusChangeOutcome, TaskStatus},
    services::{
        BulkStatusRequest, CreateDependencyRequest, DependencyConfig, DependencyServiceError,
        TransitionTaskRequest,
    },
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn chain_completes_in_dependency_order(engine: Engine) -> eyre::Result<()> {
    let design = engine.add_task("Design").await?;
    let build = engine.add_task("Build").await?;
    engine
        .manager
        .create_dependency(CreateDependencyRequest::new(design, build))
        .await?;

    let early = engine
        .orchestrator
        .transition_task(TransitionTaskRequest::new(build, "in_progress"))
        .await;
    let Err(DependencyServiceError::TransitionBlocked { blockers, .. }) = early else {
        eyre::bail!("expected a blocked transition, got {early:?}");
    };
    ensure!(blockers == vec![design]);

    // Parking a task is never gated.
    engine
        .orchestrator
        .transition_task(TransitionTaskRequest::new(build, "waiting_for_approval"))
        .await?;

    engine
        .orchestrator
        .transition_task(TransitionTaskRequest::new(design, "done"))
        .await?;
    engine
        .orchestrator
        .transition_task(TransitionTaskRequest::new(build, "in_progress"))
        .await?;
    ensure!(engine.status_of(build).await? == TaskStatus::InProgress);
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn bulk_results_follow_request_order(engine: Engine) -> eyre::Result<()> {
    let blocker = engine.add_task("Blocker").await?;
    let gated = engine.add_task("Gated").await?;
    let free = engine.add_task("Free").await?;
    engine
        .manager
        .create_dependency(CreateDependencyRequest::new(blocker, gated))
        .await?;

    let results = engine
        .orchestrator
        .apply(BulkStatusRequest::new([free, gated, blocker], "done"))
        .await?;

    let ids: Vec<_> = results.iter().map(|result| result.task_id).collect();
    ensure!(ids == vec![free, gated, blocker]);
    ensure!(results[0].is_applied());
    ensure!(matches!(results[1].outcome, StatusChangeOutcome::Denied { .. }));
    ensure!(results[2].is_applied());

    let json = serde_json::to_value(&results[1])?;
    ensure!(json["outcome"] == "denied");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn strict_bulk_change_is_all_or_nothing() -> eyre::Result<()> {
    let engine = Engine::with_config(DependencyConfig::strict());
    let blocker = engine.add_task("Blocker").await?;
    let gated = engine.add_task("Gated").await?;
    let free = engine.add_task("Free").await?;
    engine
        .manager
        .create_dependency(CreateDependencyRequest::new(blocker, gated))
        .await?;

    let results = engine
        .orchestrator
        .apply(BulkStatusRequest::new([free, gated], "in_progress"))
        .await?;

    ensure!(results.iter().all(|result| !result.is_applied()));
    ensure!(engine.status_of(free).await? == TaskStatus::Todo);

    let request =
        BulkStatusRequest::new([free, gated], "in_progress").ignoring_dependency_rules(true);
    let overridden = engine.orchestrator.apply(request).await?;
    ensure!(overridden.iter().all(|result| result.is_applied()));
    ensure!(engine.status_of(gated).await? == TaskStatus::InProgress);
    Ok(())
}
