//! Ordering engine: guarded renumber passes over one owner's active tasks.

use super::{
    OwnerGuard, OwnerLocks,
    planner::{MoveRequest, PriorityChange, plan_renumber},
};
use crate::task::{
    domain::{OwnerId, Placement, TaskId},
    ports::{TaskStore, TaskStoreError, TaskStoreResult},
};
use futures::future::join_all;
use std::sync::Arc;
use thiserror::Error;

/// Errors raised by ordering passes.
#[derive(Debug, Clone, Error)]
pub enum OrderingError {
    /// The guard came from another engine's lock registry.
    #[error("guard for owner {0} was not issued by this engine")]
    ForeignGuard(OwnerId),
    /// A read or placement write failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
}

/// Result type for ordering passes.
pub type OrderingResult<T> = Result<T, OrderingError>;

/// Result of one renumber pass.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenumberOutcome {
    /// Whether the requested task was found among active tasks and placed.
    pub placed: bool,
    /// Placement writes issued by the pass.
    pub changes: Vec<PriorityChange>,
}

impl RenumberOutcome {
    /// Returns the number of records the pass rewrote.
    #[must_use]
    pub const fn writes(&self) -> usize {
        self.changes.len()
    }
}

/// Computes and persists contiguous priorities for an owner's active tasks.
///
/// Each pass reads the owner's active list once, plans against what it
/// observed and writes only the tasks whose placement changed. Passes
/// require an [`OwnerGuard`] issued by [`Self::lock`] on this engine or one
/// of its clones, which keeps passes for one owner strictly sequential.
///
/// Writes within a pass are independent. If some fail the pass reports the
/// first error after every write has settled, leaving a partially renumbered
/// list that the next pass repairs.
pub struct OrderingEngine<S> {
    store: Arc<S>,
    locks: OwnerLocks,
}

impl<S> Clone for OrderingEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            locks: self.locks.clone(),
        }
    }
}

impl<S: TaskStore> OrderingEngine<S> {
    /// Creates an engine with its own owner lock registry.
    #[must_use]
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            locks: OwnerLocks::new(),
        }
    }

    /// Claims `owner` for a sequence of store operations and passes.
    pub async fn lock(&self, owner: &OwnerId) -> OwnerGuard {
        self.locks.acquire(owner).await
    }

    /// Returns the lock registry shared by every pass of this engine.
    #[must_use]
    pub const fn locks(&self) -> &OwnerLocks {
        &self.locks
    }

    /// Moves `task_id` into the chosen sublist at `placement` and renumbers
    /// both sublists.
    ///
    /// A task that is not active (or not stored) is left alone; the pass
    /// still compacts the remaining tasks and reports `placed = false`.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::ForeignGuard`] for a guard issued elsewhere
    /// and [`OrderingError::Store`] when the read or any placement write
    /// fails.
    pub async fn insert_or_move(
        &self,
        guard: &OwnerGuard,
        task_id: TaskId,
        is_primary: bool,
        placement: Placement,
    ) -> OrderingResult<RenumberOutcome> {
        let request = MoveRequest {
            task_id,
            is_primary,
            placement,
        };
        self.run_pass(guard, Some(&request)).await
    }

    /// Renumbers both sublists from their current order.
    ///
    /// # Errors
    ///
    /// Returns [`OrderingError::ForeignGuard`] for a guard issued elsewhere
    /// and [`OrderingError::Store`] when the read or any placement write
    /// fails.
    pub async fn renumber(&self, guard: &OwnerGuard) -> OrderingResult<RenumberOutcome> {
        self.run_pass(guard, None).await
    }

    async fn run_pass(
        &self,
        guard: &OwnerGuard,
        request: Option<&MoveRequest>,
    ) -> OrderingResult<RenumberOutcome> {
        let owner = guard.owner();
        if !self.locks.issued(guard) {
            tracing::warn!(owner = %owner, "rejected guard from another lock registry");
            return Err(OrderingError::ForeignGuard(owner.clone()));
        }

        let active = self.store.list_active(owner).await?;
        let plan = plan_renumber(&active, request);
        tracing::debug!(
            owner = %owner,
            active = active.len(),
            writes = plan.changes.len(),
            placed = plan.placed,
            "planned renumber pass"
        );
        if let Some(request) = request.filter(|_| !plan.placed) {
            tracing::debug!(
                owner = %owner,
                task_id = %request.task_id,
                "task not among active tasks, compacting only"
            );
        }

        self.write_changes(owner, &plan.changes).await?;
        Ok(RenumberOutcome {
            placed: plan.placed,
            changes: plan.changes,
        })
    }

    async fn write_changes(
        &self,
        owner: &OwnerId,
        changes: &[PriorityChange],
    ) -> TaskStoreResult<()> {
        let writes = changes.iter().map(|change| {
            self.store
                .set_placement(owner, change.task_id, change.is_primary, change.priority)
        });
        let results = join_all(writes).await;

        let mut first_error = None;
        for (change, result) in changes.iter().zip(results) {
            match result {
                Ok(()) => {}
                // Removed since the read; nothing left to renumber.
                Err(TaskStoreError::NotFound(_)) => {
                    tracing::debug!(task_id = %change.task_id, "placement target vanished");
                }
                Err(err) => {
                    tracing::warn!(
                        owner = %owner,
                        task_id = %change.task_id,
                        error = %err,
                        "placement write failed"
                    );
                    first_error.get_or_insert(err);
                }
            }
        }
        first_error.map_or(Ok(()), Err)
    }
}
