//! Record store port for task persistence and owner-scoped range reads.

use crate::task::domain::{OwnerId, Priority, Task, TaskId};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Result type for task store operations.
pub type TaskStoreResult<T> = Result<T, TaskStoreError>;

/// Task persistence contract.
///
/// Every lookup is scoped by owner: a task stored under one owner is
/// invisible through another. Implementations need per-call consistency
/// only; the ordering engine never relies on multi-record atomicity.
#[async_trait]
pub trait TaskStore: Send + Sync {
    /// Finds a task by identifier.
    ///
    /// Returns `None` when the task does not exist for `owner`.
    async fn get(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<Option<Task>>;

    /// Returns every active task for `owner` from one consistent read.
    ///
    /// Completed and canceled tasks are excluded. Results come back in
    /// creation order so that ties in priority resolve deterministically.
    async fn list_active(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>>;

    /// Returns every task for `owner`, inactive ones included, in creation
    /// order.
    async fn list(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>>;

    /// Inserts or fully replaces a task.
    async fn put(&self, task: &Task) -> TaskStoreResult<()>;

    /// Writes only the sublist flag and priority of an existing task.
    ///
    /// # Errors
    ///
    /// Returns [`TaskStoreError::NotFound`] when the task does not exist.
    async fn set_placement(
        &self,
        owner: &OwnerId,
        id: TaskId,
        is_primary: bool,
        priority: Priority,
    ) -> TaskStoreResult<()>;

    /// Removes a task permanently.
    ///
    /// Returns `true` when a record was removed.
    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<bool>;
}

/// Errors returned by task store implementations.
#[derive(Debug, Clone, Error)]
pub enum TaskStoreError {
    /// The task was not found.
    #[error("task not found: {0}")]
    NotFound(TaskId),

    /// A single store call exceeded its time limit.
    #[error("store call timed out after {0:?}")]
    Timeout(Duration),

    /// Persistence-layer failure.
    #[error("persistence error: {0}")]
    Persistence(Arc<dyn std::error::Error + Send + Sync>),
}

impl TaskStoreError {
    /// Wraps a persistence error.
    pub fn persistence(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Persistence(Arc::new(err))
    }
}
