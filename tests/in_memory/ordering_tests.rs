//! Ordering behaviour of the task service over the in-memory store.

use super::helpers::{TestService, active, create_in, ensure_contiguous, owner, service, titles};
use rstest::rstest;
use taskline::task::{
    domain::{OwnerId, TaskStatus},
    services::{CreateTaskRequest, UpdateTaskRequest},
};

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn first_primary_task_at_front_gets_priority_one(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    let created = service
        .create_task(&owner, CreateTaskRequest::new("only").primary(true).at_position(0))
        .await?;

    eyre::ensure!(created.priority().value() == 1, "got {}", created.priority());
    eyre::ensure!(created.is_primary(), "task should be primary");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn front_insert_pushes_existing_primaries_down(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    let first = create_in(&service, &owner, "P1", true).await?;
    let second = create_in(&service, &owner, "P2", true).await?;

    let fresh = service
        .create_task(&owner, CreateTaskRequest::new("P0").primary(true).at_position(0))
        .await?;

    let first_now = service.get_task(&owner, first.id()).await?;
    let second_now = service.get_task(&owner, second.id()).await?;
    eyre::ensure!(fresh.priority().value() == 1, "new task should lead");
    eyre::ensure!(
        first_now.map(|task| task.priority().value()) == Some(2),
        "P1 should be 2"
    );
    eyre::ensure!(
        second_now.map(|task| task.priority().value()) == Some(3),
        "P2 should be 3"
    );
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn secondary_insert_uses_combined_position(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    for index in 1..=3 {
        create_in(&service, &owner, &format!("P{index}"), true).await?;
    }
    let mut secondaries = Vec::new();
    for index in 1..=16 {
        secondaries.push(create_in(&service, &owner, &format!("S{index}"), false).await?);
    }

    let fresh = service
        .create_task(&owner, CreateTaskRequest::new("new").at_position(8))
        .await?;

    eyre::ensure!(
        fresh.priority().value() == 6 && !fresh.is_primary(),
        "new task should be the sixth secondary"
    );
    for (index, task) in secondaries.iter().enumerate() {
        let stored = service
            .get_task(&owner, task.id())
            .await?
            .ok_or_else(|| eyre::eyre!("secondary task vanished"))?;
        let before = task.priority().value();
        let expected = if index < 5 { before } else { before + 1 };
        eyre::ensure!(
            stored.priority().value() == expected,
            "{} moved from {before} to {}",
            task.title(),
            stored.priority()
        );
    }
    ensure_contiguous(&service, &owner).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn repeated_front_inserts_reverse_creation_order(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    for index in 1..=5 {
        service
            .create_task(
                &owner,
                CreateTaskRequest::new(format!("T{index}"))
                    .primary(true)
                    .at_position(0),
            )
            .await?;
    }

    let order = titles(&service, &owner).await?;
    eyre::ensure!(order == ["T5", "T4", "T3", "T2", "T1"], "got {order:?}");
    ensure_contiguous(&service, &owner).await
}

#[rstest]
#[case::create_far_past_end(99)]
#[case::create_just_past_end(3)]
#[tokio::test(flavor = "multi_thread")]
async fn positions_past_the_end_append(
    #[case] position: usize,
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    create_in(&service, &owner, "a", true).await?;
    create_in(&service, &owner, "b", false).await?;

    let fresh = service
        .create_task(&owner, CreateTaskRequest::new("c").at_position(position))
        .await?;

    eyre::ensure!(fresh.priority().value() == 2, "got {}", fresh.priority());
    eyre::ensure!(titles(&service, &owner).await? == ["a", "b", "c"], "order");
    ensure_contiguous(&service, &owner).await
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn second_reprioritize_writes_nothing(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    create_in(&service, &owner, "a", true).await?;
    let dropped = create_in(&service, &owner, "b", true).await?;
    create_in(&service, &owner, "c", true).await?;
    service.delete_task(&owner, dropped.id()).await?;

    let first = service.reprioritize(&owner, None).await?;
    let second = service.reprioritize(&owner, None).await?;

    eyre::ensure!(first.writes() == 1, "gap should need one write");
    eyre::ensure!(second.writes() == 0, "second pass wrote {}", second.writes());
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn deleting_completed_task_keeps_active_priorities(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    create_in(&service, &owner, "a", true).await?;
    create_in(&service, &owner, "b", false).await?;
    let done = create_in(&service, &owner, "done", false).await?;
    service
        .update_task(&owner, done.id(), UpdateTaskRequest::new().with_status("completed"))
        .await?;
    let before: Vec<(String, u32)> = active(&service, &owner)
        .await?
        .iter()
        .map(|task| (task.title().to_owned(), task.priority().value()))
        .collect();

    let removed = service.delete_task(&owner, done.id()).await?;

    let after: Vec<(String, u32)> = active(&service, &owner)
        .await?
        .iter()
        .map(|task| (task.title().to_owned(), task.priority().value()))
        .collect();
    eyre::ensure!(removed, "completed task should be deleted");
    eyre::ensure!(before == after, "{before:?} became {after:?}");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn mixed_mutations_keep_sublists_contiguous(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    let mut created = Vec::new();
    for index in 0..8 {
        created.push(create_in(&service, &owner, &format!("t{index}"), index % 3 == 0).await?);
        ensure_contiguous(&service, &owner).await?;
    }

    let steps = [
        (0, UpdateTaskRequest::new().primary(false)),
        (1, UpdateTaskRequest::new().primary(true).with_priority(1)),
        (2, UpdateTaskRequest::new().with_status("completed")),
        (3, UpdateTaskRequest::new().at_position(0)),
        (4, UpdateTaskRequest::new().with_priority(9)),
        (2, UpdateTaskRequest::new().with_status(TaskStatus::Open.as_str())),
        (5, UpdateTaskRequest::new().with_status("canceled")),
        (6, UpdateTaskRequest::new().primary(true).at_position(1)),
        (7, UpdateTaskRequest::new().with_title("renamed")),
    ];
    for (index, request) in steps {
        let task = created
            .get(index)
            .ok_or_else(|| eyre::eyre!("missing task {index}"))?;
        service.update_task(&owner, task.id(), request).await?;
        ensure_contiguous(&service, &owner).await?;
    }

    let outcome = service.reprioritize(&owner, None).await?;
    eyre::ensure!(outcome.writes() == 0, "ordering should already be settled");
    Ok(())
}

#[rstest]
#[tokio::test(flavor = "multi_thread")]
async fn explicit_move_keeps_the_sublist(
    service: TestService,
    owner: OwnerId,
) -> eyre::Result<()> {
    create_in(&service, &owner, "p1", true).await?;
    create_in(&service, &owner, "p2", true).await?;
    let moved = create_in(&service, &owner, "p3", true).await?;
    create_in(&service, &owner, "s1", false).await?;

    let outcome = service
        .reprioritize(&owner, Some((moved.id(), 0)))
        .await?;

    eyre::ensure!(outcome.placed, "task should be placed");
    eyre::ensure!(
        titles(&service, &owner).await? == ["p3", "p1", "p2", "s1"],
        "unexpected order"
    );
    ensure_contiguous(&service, &owner).await
}
