//! Per-call timeout decorator for any task store.

use crate::task::{
    domain::{OwnerId, Priority, Task, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Wraps a store so that every individual call is bounded by a time limit.
///
/// The limit applies to one call, never to a whole renumber pass.
///
/// Timing out only abandons the wait. The underlying call is not cancelled:
/// a blocking write may still land after the caller has released its
/// owner guard, and so after a later queued pass has read the list. That
/// pass does not observe the write; the pass after it repairs any
/// resulting duplicates. Stores that can cancel work server-side should do
/// so with a tighter limit, as
/// [`StatementTimeout`](super::postgres::StatementTimeout) does for
/// `PostgreSQL`.
#[derive(Debug)]
pub struct TimeoutTaskStore<S> {
    inner: Arc<S>,
    limit: Option<Duration>,
}

impl<S> Clone for TimeoutTaskStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            limit: self.limit,
        }
    }
}

impl<S: TaskStore> TimeoutTaskStore<S> {
    /// Wraps `inner`. `None` disables the limit.
    #[must_use]
    pub const fn new(inner: Arc<S>, limit: Option<Duration>) -> Self {
        Self { inner, limit }
    }

    async fn bounded<T>(
        &self,
        call: impl Future<Output = TaskStoreResult<T>> + Send,
    ) -> TaskStoreResult<T> {
        let Some(limit) = self.limit else {
            return call.await;
        };
        if let Ok(result) = tokio::time::timeout(limit, call).await {
            result
        } else {
            tracing::warn!(limit = ?limit, "task store call timed out");
            Err(TaskStoreError::Timeout(limit))
        }
    }
}

#[async_trait]
impl<S: TaskStore> TaskStore for TimeoutTaskStore<S> {
    async fn get(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<Option<Task>> {
        self.bounded(self.inner.get(owner, id)).await
    }

    async fn list_active(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        self.bounded(self.inner.list_active(owner)).await
    }

    async fn list(&self, owner: &OwnerId) -> TaskStoreResult<Vec<Task>> {
        self.bounded(self.inner.list(owner)).await
    }

    async fn put(&self, task: &Task) -> TaskStoreResult<()> {
        self.bounded(self.inner.put(task)).await
    }

    async fn set_placement(
        &self,
        owner: &OwnerId,
        id: TaskId,
        is_primary: bool,
        priority: Priority,
    ) -> TaskStoreResult<()> {
        self.bounded(self.inner.set_placement(owner, id, is_primary, priority))
            .await
    }

    async fn delete(&self, owner: &OwnerId, id: TaskId) -> TaskStoreResult<bool> {
        self.bounded(self.inner.delete(owner, id)).await
    }
}
