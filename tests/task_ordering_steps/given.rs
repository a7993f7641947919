//! Given steps for task ordering BDD scenarios.

use super::world::{TaskOrderingWorld, run_async, split_titles};
use eyre::WrapErr;
use rstest_bdd_macros::given;
use taskline::task::{
    domain::OwnerId,
    services::{CreateTaskRequest, UpdateTaskRequest},
};

fn create_tasks(
    world: &mut TaskOrderingWorld,
    owner: &str,
    titles: &str,
    is_primary: bool,
) -> Result<(), eyre::Report> {
    let owner = OwnerId::new(owner).wrap_err("scenario owner should be valid")?;
    for title in split_titles(titles) {
        let request = CreateTaskRequest::new(title.clone()).primary(is_primary);
        let created = run_async(world.service.create_task(&owner, request))
            .wrap_err("create task for ordering scenario")?;
        world.tasks_by_title.insert(title, created.id());
    }
    world.owner = Some(owner);
    Ok(())
}

#[given(r#"owner "{owner}" has primary tasks "{titles}""#)]
fn owner_has_primary_tasks(
    world: &mut TaskOrderingWorld,
    owner: String,
    titles: String,
) -> Result<(), eyre::Report> {
    create_tasks(world, &owner, &titles, true)
}

#[given(r#"owner "{owner}" has secondary tasks "{titles}""#)]
fn owner_has_secondary_tasks(
    world: &mut TaskOrderingWorld,
    owner: String,
    titles: String,
) -> Result<(), eyre::Report> {
    create_tasks(world, &owner, &titles, false)
}

#[given(r#"task "{title}" has been marked "{status}""#)]
fn task_has_been_marked(
    world: &mut TaskOrderingWorld,
    title: String,
    status: String,
) -> Result<(), eyre::Report> {
    let owner = world.owner()?;
    let id = world.task_id(&title)?;
    run_async(
        world
            .service
            .update_task(&owner, id, UpdateTaskRequest::new().with_status(status)),
    )
    .wrap_err("mark task in scenario setup")?
    .ok_or_else(|| eyre::eyre!("task {title} vanished during setup"))?;
    Ok(())
}
