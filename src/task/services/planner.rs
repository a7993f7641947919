//! Pure renumber planning.
//!
//! The planner sees one consistent snapshot of an owner's active tasks and
//! decides which tasks need a new sublist flag or priority. It never looks at
//! numeric gaps: the order it observes is the only input, so planning over
//! an already-contiguous snapshot yields no changes.

use crate::task::domain::{Placement, Priority, Task, TaskId};

/// Request to place one task during a renumber pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveRequest {
    /// Task to place.
    pub task_id: TaskId,
    /// Target sublist.
    pub is_primary: bool,
    /// Landing spot inside the target sublist.
    pub placement: Placement,
}

/// New placement for a single task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PriorityChange {
    /// Task being rewritten.
    pub task_id: TaskId,
    /// Sublist the task ends up in.
    pub is_primary: bool,
    /// Priority the task ends up with.
    pub priority: Priority,
}

/// Outcome of planning a pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenumberPlan {
    /// Whether the requested task was found and spliced in.
    pub placed: bool,
    /// Tasks whose stored placement differs from the planned one.
    pub changes: Vec<PriorityChange>,
}

/// Computes the placement changes for one owner's active tasks.
///
/// Both sublists are stably sorted by their current priority, so tasks with
/// equal or corrupted priorities keep the snapshot order. When `request`
/// names a task that is not in the snapshot, nothing is spliced and the plan
/// only compacts the existing order.
#[must_use]
pub fn plan_renumber(active: &[Task], request: Option<&MoveRequest>) -> RenumberPlan {
    let (mut primary, mut secondary): (Vec<&Task>, Vec<&Task>) =
        active.iter().partition(|task| task.is_primary());
    primary.sort_by_key(|task| task.priority());
    secondary.sort_by_key(|task| task.priority());

    let mut moved_id = None;
    if let Some(request) = request {
        let moved = take_task(&mut primary, request.task_id)
            .or_else(|| take_task(&mut secondary, request.task_id));
        if let Some(task) = moved {
            let offset =
                request
                    .placement
                    .offset(request.is_primary, primary.len(), secondary.len());
            let target = if request.is_primary {
                &mut primary
            } else {
                &mut secondary
            };
            target.insert(offset, task);
            moved_id = Some(request.task_id);
        }
    }

    let mut changes = diff_sublist(&primary, true);
    changes.extend(diff_sublist(&secondary, false));
    RenumberPlan {
        placed: moved_id.is_some(),
        changes,
    }
}

fn take_task<'a>(list: &mut Vec<&'a Task>, task_id: TaskId) -> Option<&'a Task> {
    let index = list.iter().position(|task| task.id() == task_id)?;
    Some(list.remove(index))
}

fn diff_sublist(list: &[&Task], is_primary: bool) -> Vec<PriorityChange> {
    list.iter()
        .enumerate()
        .filter_map(|(index, task)| {
            let priority = Priority::from_index(index);
            let unchanged = task.priority() == priority && task.is_primary() == is_primary;
            (!unchanged).then_some(PriorityChange {
                task_id: task.id(),
                is_primary,
                priority,
            })
        })
        .collect()
}
