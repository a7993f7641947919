//! When steps for task ordering BDD scenarios.

use super::world::{TaskOrderingWorld, run_async};
use eyre::WrapErr;
use rstest_bdd_macros::when;
use taskline::task::services::{CreateTaskRequest, UpdateTaskRequest};

#[when(r#"a primary task "{title}" is created at position {position:usize}"#)]
fn primary_task_created_at(
    world: &mut TaskOrderingWorld,
    title: String,
    position: usize,
) -> Result<(), eyre::Report> {
    let owner = world.owner()?;
    let request = CreateTaskRequest::new(title.clone())
        .primary(true)
        .at_position(position);
    let created = run_async(world.service.create_task(&owner, request))
        .wrap_err("create positioned task")?;
    world.tasks_by_title.insert(title, created.id());
    Ok(())
}

fn apply_update(
    world: &mut TaskOrderingWorld,
    title: &str,
    request: UpdateTaskRequest,
) -> Result<(), eyre::Report> {
    let owner = world.owner()?;
    let id = world.task_id(title)?;
    let result = run_async(world.service.update_task(&owner, id, request));
    world.last_update_result = Some(result);
    Ok(())
}

#[when(r#"task "{title}" is marked "{status}""#)]
fn task_is_marked(
    world: &mut TaskOrderingWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    apply_update(world, &title, UpdateTaskRequest::new().with_status(status))
}

#[when(r#"task "{title}" is promoted"#)]
fn task_is_promoted(world: &mut TaskOrderingWorld, title: String) -> Result<(), eyre::Report> {
    apply_update(world, &title, UpdateTaskRequest::new().primary(true))
}

#[when(r#"task "{title}" is deleted"#)]
fn task_is_deleted(world: &mut TaskOrderingWorld, title: String) -> Result<(), eyre::Report> {
    let owner = world.owner()?;
    let id = world.task_id(&title)?;
    let removed =
        run_async(world.service.delete_task(&owner, id)).wrap_err("delete scenario task")?;
    eyre::ensure!(removed, "task {title} should have been deleted");
    Ok(())
}

#[when("the owner's tasks are reprioritized twice")]
fn tasks_reprioritized_twice(world: &mut TaskOrderingWorld) -> Result<(), eyre::Report> {
    let owner = world.owner()?;
    for _ in 0..2 {
        let outcome = run_async(world.service.reprioritize(&owner, None))
            .wrap_err("reprioritize scenario owner")?;
        world.pass_outcomes.push(outcome);
    }
    Ok(())
}
