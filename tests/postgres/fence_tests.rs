//! Advisory-lock fencing between hosts sharing one database.

use std::sync::Arc;
use std::time::Duration;

use crate::postgres::helpers::{PostgresContext, context, pool_for};
use eyre::ensure;
use mockable::DefaultClock;
use rstest::rstest;
use taskgate::dependency::{
    adapters::postgres::{PostgresEdgeStore, PostgresGraphFence, PostgresTaskStore},
    ports::GraphFence,
    services::{CreateDependencyRequest, DependencyManager, DependencyServiceError, GraphLock},
};

type Host = DependencyManager<PostgresTaskStore, PostgresEdgeStore, DefaultClock>;

/// Services with their own pool and in-process lock, as a second process
/// would build them.
fn host(context: &PostgresContext) -> eyre::Result<Host> {
    let pool = pool_for(&context.database, 3)?;
    let lock = GraphLock::new().with_fence(Arc::new(PostgresGraphFence::new(pool.clone())));
    Ok(DependencyManager::new(
        Arc::new(PostgresTaskStore::new(pool.clone())),
        Arc::new(PostgresEdgeStore::new(pool)),
        Arc::new(DefaultClock),
        lock,
    ))
}

#[rstest]
fn second_holder_waits_until_first_leaves(context: PostgresContext) -> eyre::Result<()> {
    let first = PostgresGraphFence::new(pool_for(&context.database, 1)?);
    let second = PostgresGraphFence::new(pool_for(&context.database, 1)?);

    let held = context.rt.block_on(first.enter())?;
    let waiting = context.rt.spawn(async move { second.enter().await });

    context.rt.block_on(context.rt.spawn_blocking(|| {
        std::thread::sleep(Duration::from_millis(200));
    }))?;
    ensure!(!waiting.is_finished(), "second holder entered while the fence was held");

    drop(held);
    let entered = context.rt.block_on(waiting)??;
    drop(entered);
    Ok(())
}

#[rstest]
fn opposing_links_from_two_hosts_never_form_a_cycle(
    context: PostgresContext,
) -> eyre::Result<()> {
    let a = context.task("A")?;
    let b = context.task("B")?;
    let left = host(&context)?;
    let right = host(&context)?;

    let (forward, backward) = context.rt.block_on(async {
        tokio::join!(
            left.create_dependency(CreateDependencyRequest::new(a, b)),
            right.create_dependency(CreateDependencyRequest::new(b, a)),
        )
    });

    let cycles = [&forward, &backward]
        .iter()
        .filter(|result| matches!(result, Err(DependencyServiceError::CycleDetected(_))))
        .count();
    ensure!(
        forward.is_ok() != backward.is_ok() && cycles == 1,
        "expected one link and one cycle rejection, got {forward:?} and {backward:?}"
    );

    let stored = context.targets_of(a)?.len() + context.targets_of(b)?.len();
    ensure!(stored == 1);
    Ok(())
}
