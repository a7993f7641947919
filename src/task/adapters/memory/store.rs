//! In-memory task store for tests and single-process deployments.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::task::{
    domain::{OwnerId, Priority, Task, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};

/// Thread-safe in-memory task store.
#[derive(Debug, Clone, Default)]
pub struct InMemoryTaskStore {
    state: Arc<RwLock<InMemoryTaskState>>,
}

#[derive(Debug, Default)]
struct InMemoryTaskState {
    tasks: HashMap<TaskId, Task>,
    // Insertion-ordered task IDs per owner, standing in for a range index.
    owner_index: HashMap<OwnerId, Vec<TaskId>>,
}

impl InMemoryTaskStore {
    /// Creates an empty in-memory store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned(err: &impl std::fmt::Display) -> TaskStoreError {
    TaskStoreError::persistence(std::io::Error::other(err.to_string()))
}

/// Collects an owner's tasks in index order, keeping those that match.
fn collect_owned(
    state: &InMemoryTaskState,
    owner: &OwnerId,
    keep: impl Fn(&Task) -> bool,
) -> Vec<Task> {
    state
        .owner_index
        .get(owner)
        .map(|ids| {
            ids.iter()
                .filter_map(|id| state.tasks.get(id))
                .filter(|task| keep(*task))
                .cloned()
                .collect()
        })
        .unwrap_or_default()
}

fn owned_mut<'a>(
    state: &'a mut InMemoryTaskState,
    owner: &OwnerId,
    id: TaskId,
) -> Option<&'a mut Task> {
    state.tasks.get_mut(&id).filter(|task| task.owner() == owner)
}

#[async_trait]
impl TaskStore for InMemoryTaskStore {
    async fn get(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(state
            .tasks
            .get(&id)
            .filter(|task| task.owner() == owner)
            .cloned())
    }

    async fn list_active(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(collect_owned(&state, owner, Task::is_active))
    }

    async fn list(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        let state = self.state.read().map_err(|err| poisoned(&err))?;
        Ok(collect_owned(&state, owner, |_| true))
    }

    async fn put(&self, task: &Task) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let previous = state.tasks.insert(task.id(), task.clone());

        // An upsert may move a record between owners; keep the index exact.
        if let Some(old) = previous.filter(|old| old.owner() != task.owner()) {
            if let Some(ids) = state.owner_index.get_mut(old.owner()) {
                ids.retain(|id| *id != task.id());
            }
        }
        let ids = state.owner_index.entry(task.owner().clone()).or_default();
        if !ids.contains(&task.id()) {
            ids.push(task.id());
        }
        Ok(())
    }

    async fn set_placement(
        &self,
        owner: &OwnerId,
        id: TaskId,
        is_primary: bool,
        priority: Priority,
    ) -> TaskStoreResult<()> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        let task = owned_mut(&mut state, owner, id).ok_or(TaskStoreError::NotFound(id))?;
        task.place(is_primary, priority);
        Ok(())
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<bool> {
        let mut state = self.state.write().map_err(|err| poisoned(&err))?;
        if owned_mut(&mut state, owner, id).is_none() {
            return Ok(false);
        }
        state.tasks.remove(&id);
        if let Some(ids) = state.owner_index.get_mut(owner) {
            ids.retain(|existing| *existing != id);
            if ids.is_empty() {
                state.owner_index.remove(owner);
            }
        }
        Ok(true)
    }
}
