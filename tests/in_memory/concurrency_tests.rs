//! Concurrent requests against one and several owners.

use super::helpers::{TestService, active, create_in, ensure_contiguous, owner, service};
use futures::future::join_all;
use rstest::rstest;
use taskline::task::{
    domain::OwnerId,
    services::{CreateTaskRequest, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn promotion_and_demotion_race_leaves_no_duplicates(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    create_in(&service, &owner, "p1", true).await?;
    let demoted = create_in(&service, &owner, "p2", true).await?;
    let promoted = create_in(&service, &owner, "s1", false).await?;
    create_in(&service, &owner, "s2", false).await?;

    let promote = {
        let service = service.clone();
        let owner = owner.clone();
        tokio::spawn(async move {
            service
                .update_task(&owner, promoted.id(), UpdateTaskRequest::new().primary(true))
                .await
        })
    };
    let demote = {
        let service = service.clone();
        let owner = owner.clone();
        tokio::spawn(async move {
            service
                .update_task(
                    &owner,
                    demoted.id(),
                    UpdateTaskRequest::new().primary(false).at_position(0),
                )
                .await
        })
    };
    promote.await??;
    demote.await??;

    let tasks = active(&service, &owner).await?;
    let placement = |title: &str| {
        tasks
            .iter()
            .find(|task| task.title() == title)
            .map(|task| (task.is_primary(), task.priority().value()))
    };
    eyre::ensure!(placement("p2") == Some((false, 1)), "p2 should lead secondaries");
    eyre::ensure!(
        placement("s1").is_some_and(|(is_primary, _)| is_primary),
        "s1 should be primary"
    );
    ensure_contiguous(&service, &owner).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn concurrent_front_inserts_serialize_per_owner(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    let handles: Vec<_> = (0..12)
        .map(|index| {
            let service = service.clone();
            let owner = owner.clone();
            tokio::spawn(async move {
                let request = CreateTaskRequest::new(format!("t{index}"))
                    .primary(index % 2 == 0)
                    .at_position(0);
                service.create_task(&owner, request).await
            })
        })
        .collect();
    for result in join_all(handles).await {
        result??;
    }

    let tasks = active(&service, &owner).await?;
    eyre::ensure!(tasks.len() == 12, "expected 12 tasks, got {}", tasks.len());
    ensure_contiguous(&service, &owner).await?;
    eyre::ensure!(
        service.engine().locks().pending_owners() == 0,
        "idle owner slots should be evicted"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn owners_are_ordered_independently(service: TestService) -> eyre::Result<()> {
    let owners: Vec<OwnerId> = ["alice", "bob", "carol"]
        .into_iter()
        .map(OwnerId::new)
        .collect::<Result<_, _>>()?;

    let handles: Vec<_> = owners
        .iter()
        .flat_map(|owner| (0..5).map(move |index| (owner.clone(), index)))
        .map(|(owner, index)| {
            let service = service.clone();
            tokio::spawn(async move {
                let request = CreateTaskRequest::new(format!("{owner}-{index}")).at_position(0);
                service.create_task(&owner, request).await
            })
        })
        .collect();
    for result in join_all(handles).await {
        result??;
    }

    for owner in &owners {
        let tasks = active(&service, owner).await?;
        eyre::ensure!(tasks.len() == 5, "{owner} has {} tasks", tasks.len());
        eyre::ensure!(
            tasks.iter().all(|task| task.owner() == owner),
            "{owner} sees another owner's task"
        );
        ensure_contiguous(&service, owner).await?;
    }
    Ok(())
}
