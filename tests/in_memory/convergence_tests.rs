//! Recovery from partially applied renumber passes.

use super::helpers::{FlakyStore, active, create_in, ensure_contiguous, owner};
use mockable::DefaultClock;
use rstest::rstest;
use std::sync::Arc;
use taskline::task::{
    domain::OwnerId,
    services::{CreateTaskRequest, TaskService, TaskServiceError},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn failed_pass_keeps_the_task_and_next_pass_repairs(owner: OwnerId) -> eyre::Result<()> {
    let store = Arc::new(FlakyStore::default());
    let service = TaskService::new(Arc::clone(&store), Arc::new(DefaultClock));
    for title in ["a", "b", "c"] {
        create_in(&service, &owner, title, false).await?;
    }

    store.fail_next_placements(2);
    let result = service
        .create_task(&owner, CreateTaskRequest::new("front").at_position(0))
        .await;

    eyre::ensure!(
        matches!(result, Err(TaskServiceError::Store(_))),
        "expected a store error, got {result:?}"
    );
    let tasks = active(&service, &owner).await?;
    eyre::ensure!(
        tasks.iter().any(|task| task.title() == "front"),
        "created task should stay stored"
    );

    let writes_before = store.placement_writes();
    service.reprioritize(&owner, None).await?;
    ensure_contiguous(&service, &owner).await?;

    let settled = service.reprioritize(&owner, None).await?;
    eyre::ensure!(settled.writes() == 0, "repair should converge in one pass");
    eyre::ensure!(
        store.placement_writes() > writes_before,
        "repair pass should have rewritten placements"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn later_placement_change_also_repairs(owner: OwnerId) -> eyre::Result<()> {
    let store = Arc::new(FlakyStore::default());
    let service = TaskService::new(Arc::clone(&store), Arc::new(DefaultClock));
    let first = create_in(&service, &owner, "a", true).await?;
    create_in(&service, &owner, "b", true).await?;

    store.fail_next_placements(1);
    let failed = service
        .create_task(&owner, CreateTaskRequest::new("c").primary(true).at_position(0))
        .await;
    eyre::ensure!(failed.is_err(), "injected failure should surface");

    service
        .reprioritize(&owner, Some((first.id(), 2)))
        .await?;

    ensure_contiguous(&service, &owner).await
}
