//! Then steps for task ordering BDD scenarios.

use super::world::{TaskOrderingWorld, split_titles};
use rstest_bdd_macros::then;
use taskline::task::{domain::TaskDomainError, services::TaskServiceError};

fn sublist_titles(world: &TaskOrderingWorld, is_primary: bool) -> Result<Vec<String>, eyre::Report> {
    Ok(world
        .active_tasks()?
        .iter()
        .filter(|task| task.is_primary() == is_primary)
        .map(|task| task.title().to_owned())
        .collect())
}

#[then(r#"the primary order is "{titles}""#)]
fn primary_order_is(world: &TaskOrderingWorld, titles: String) -> Result<(), eyre::Report> {
    let actual = sublist_titles(world, true)?;
    let expected = split_titles(&titles);
    eyre::ensure!(actual == expected, "expected {expected:?}, found {actual:?}");
    Ok(())
}

#[then(r#"the secondary order is "{titles}""#)]
fn secondary_order_is(world: &TaskOrderingWorld, titles: String) -> Result<(), eyre::Report> {
    let actual = sublist_titles(world, false)?;
    let expected = split_titles(&titles);
    eyre::ensure!(actual == expected, "expected {expected:?}, found {actual:?}");
    Ok(())
}

#[then("every active list is numbered without gaps")]
fn lists_are_contiguous(world: &TaskOrderingWorld) -> Result<(), eyre::Report> {
    let tasks = world.active_tasks()?;
    for is_primary in [true, false] {
        let priorities: Vec<u32> = tasks
            .iter()
            .filter(|task| task.is_primary() == is_primary)
            .map(|task| task.priority().value())
            .collect();
        let expected: Vec<u32> = (1..).take(priorities.len()).collect();
        eyre::ensure!(
            priorities == expected,
            "priorities {priorities:?} are not contiguous"
        );
    }
    Ok(())
}

#[then("the second pass writes nothing")]
fn second_pass_writes_nothing(world: &TaskOrderingWorld) -> Result<(), eyre::Report> {
    let second = world
        .pass_outcomes
        .get(1)
        .ok_or_else(|| eyre::eyre!("missing second reprioritize outcome"))?;
    eyre::ensure!(second.writes() == 0, "second pass wrote {}", second.writes());
    Ok(())
}

#[then("the update fails with an invalid status transition error")]
fn update_fails_with_invalid_transition(world: &TaskOrderingWorld) -> Result<(), eyre::Report> {
    let result = world
        .last_update_result
        .as_ref()
        .ok_or_else(|| eyre::eyre!("missing update result"))?;

    if !matches!(
        result,
        Err(TaskServiceError::Domain(
            TaskDomainError::InvalidStatusTransition { .. }
        ))
    ) {
        return Err(eyre::eyre!(
            "expected InvalidStatusTransition error, got {result:?}"
        ));
    }
    Ok(())
}
