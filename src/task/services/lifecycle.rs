//! Task orchestration: create, update, delete, list and reprioritize.

use super::{
    OrderingEngine, OrderingError, OwnerGuard, RenumberOutcome, TaskServiceConfig,
    requests::{CreateTaskRequest, RequestValidationError, UpdateTaskRequest},
};
use crate::task::{
    adapters::TimeoutTaskStore,
    domain::{
        NewTaskData, OwnerId, ParseTaskStatusError, Placement, Priority, Task, TaskDomainError,
        TaskFieldEdit, TaskFilter, TaskId, TaskUpdate,
    },
    ports::{TaskStore, TaskStoreError},
};
use mockable::Clock;
use std::sync::Arc;
use thiserror::Error;

/// Service-level errors for task operations.
#[derive(Debug, Error)]
pub enum TaskServiceError {
    /// Domain validation failed.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The status string is not recognised.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
    /// Store operation failed.
    #[error(transparent)]
    Store(#[from] TaskStoreError),
    /// An ordering pass was refused before touching the store.
    #[error(transparent)]
    Ordering(OrderingError),
}

impl From<OrderingError> for TaskServiceError {
    fn from(err: OrderingError) -> Self {
        match err {
            OrderingError::Store(inner) => Self::Store(inner),
            refused @ OrderingError::ForeignGuard(_) => Self::Ordering(refused),
        }
    }
}

impl From<RequestValidationError> for TaskServiceError {
    fn from(err: RequestValidationError) -> Self {
        match err {
            RequestValidationError::Domain(inner) => Self::Domain(inner),
            RequestValidationError::InvalidStatus(inner) => Self::InvalidStatus(inner),
        }
    }
}

/// Result type for task service operations.
pub type TaskServiceResult<T> = Result<T, TaskServiceError>;

/// Where a task should end up once content and status edits are applied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PlacementTarget {
    is_primary: bool,
    placement: Placement,
}

/// Task orchestration service.
///
/// Every mutating operation holds the owner's guard from its first store
/// read to its final re-read, so concurrent requests for one owner apply
/// one after another. Nothing is rolled back on failure: a later pass
/// recomputes priorities from whatever state the store holds.
pub struct TaskService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    store: Arc<TimeoutTaskStore<S>>,
    engine: OrderingEngine<TimeoutTaskStore<S>>,
    clock: Arc<C>,
    config: TaskServiceConfig,
}

impl<S, C> Clone for TaskService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            engine: self.engine.clone(),
            clock: Arc::clone(&self.clock),
            config: self.config.clone(),
        }
    }
}

impl<S, C> TaskService<S, C>
where
    S: TaskStore,
    C: Clock + Send + Sync,
{
    /// Creates a service with the default configuration.
    #[must_use]
    pub fn new(store: Arc<S>, clock: Arc<C>) -> Self {
        Self::with_config(store, clock, TaskServiceConfig::default())
    }

    /// Creates a service with an explicit configuration.
    #[must_use]
    pub fn with_config(store: Arc<S>, clock: Arc<C>, config: TaskServiceConfig) -> Self {
        let bounded = Arc::new(TimeoutTaskStore::new(store, config.store_timeout()));
        Self {
            engine: OrderingEngine::new(Arc::clone(&bounded)),
            store: bounded,
            clock,
            config,
        }
    }

    /// Returns the active configuration.
    #[must_use]
    pub const fn config(&self) -> &TaskServiceConfig {
        &self.config
    }

    /// Returns the ordering engine driving this service.
    #[must_use]
    pub const fn engine(&self) -> &OrderingEngine<TimeoutTaskStore<S>> {
        &self.engine
    }

    /// Creates a task and places it in the owner's ordering.
    ///
    /// The task lands at the explicit position if given, else at the
    /// requested priority within its sublist, else at the end. Tasks created
    /// as completed or canceled keep their requested priority and skip
    /// placement.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Domain`] or
    /// [`TaskServiceError::InvalidStatus`] before any store access when the
    /// request is invalid, and [`TaskServiceError::Store`] when persistence
    /// fails. A failed placement leaves the created task stored.
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub async fn create_task(
        &self,
        owner: &OwnerId,
        request: CreateTaskRequest,
    ) -> TaskServiceResult<Task> {
        let validated = request.validate(&self.config)?;
        let placement = validated.placement;
        let task = Task::new(
            NewTaskData {
                owner: owner.clone(),
                title: validated.title,
                description: validated.description,
                status: validated.status,
                is_primary: validated.is_primary,
                priority: validated.priority,
                due_date: validated.due_date,
                tags: validated.tags,
            },
            &*self.clock,
        );

        let guard = self.engine.lock(owner).await;
        self.store.put(&task).await?;
        tracing::info!(task_id = %task.id(), primary = task.is_primary(), "task created");
        if task.is_active() {
            self.engine
                .insert_or_move(&guard, task.id(), task.is_primary(), placement)
                .await?;
        }
        self.reload(&guard, task.id()).await
    }

    /// Applies a partial update.
    ///
    /// Content and status edits are stored first. Then:
    /// - an explicit position moves the task there;
    /// - a sublist change without a rank appends it to the new sublist;
    /// - a task leaving the active set triggers a compaction pass;
    /// - a task re-entering the active set is appended to its sublist.
    ///
    /// Returns `Ok(None)` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns validation errors before any store access, domain errors for
    /// forbidden status transitions, and store errors from persistence.
    #[tracing::instrument(skip_all, fields(owner = %owner, task_id = %id))]
    pub async fn update_task(
        &self,
        owner: &OwnerId,
        id: TaskId,
        request: UpdateTaskRequest,
    ) -> TaskServiceResult<Option<Task>> {
        let commands = request.into_commands(&self.config)?;

        let guard = self.engine.lock(owner).await;
        let Some(mut task) = self.store.get(owner, id).await? else {
            tracing::debug!("update target not found");
            return Ok(None);
        };
        let original = task.clone();

        let mut target = None;
        for command in commands {
            match command {
                TaskUpdate::FieldEdit(edit) => self.apply_field_edit(&mut task, edit),
                TaskUpdate::StatusChange(status) => task.transition_to(status, &*self.clock)?,
                TaskUpdate::PositionMove {
                    placement,
                    is_primary,
                } => {
                    target = Some(PlacementTarget {
                        is_primary: is_primary.unwrap_or(task.is_primary()),
                        placement,
                    });
                }
                TaskUpdate::PromotionDemotion {
                    is_primary,
                    priority,
                } => target = promotion_target(&task, is_primary, priority),
            }
        }

        // Inactive tasks take no part in ordering; a sublist switch is
        // recorded as-is.
        if let Some(switch) = target.filter(|_| !task.is_active()) {
            task.place(switch.is_primary, task.priority());
            target = None;
        }
        if task != original {
            self.store.put(&task).await?;
        }

        let reentered = task.is_active() && !original.is_active();
        let left = !task.is_active() && original.is_active();
        match target {
            Some(planned) => {
                self.engine
                    .insert_or_move(&guard, id, planned.is_primary, planned.placement)
                    .await?;
            }
            None if reentered => {
                self.engine
                    .insert_or_move(&guard, id, task.is_primary(), Placement::End)
                    .await?;
            }
            None if left => {
                self.engine.renumber(&guard).await?;
            }
            None => {}
        }

        self.reload(&guard, id).await.map(Some)
    }

    /// Permanently removes a task.
    ///
    /// Other tasks keep their priorities unless `compact_after_delete` is
    /// enabled. Returns `false` when the task does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when persistence fails.
    #[tracing::instrument(skip_all, fields(owner = %owner, task_id = %id))]
    pub async fn delete_task(&self, owner: &OwnerId, id: TaskId) -> TaskServiceResult<bool> {
        let guard = self.engine.lock(owner).await;
        let removed = self.store.delete(owner, id).await?;
        if removed {
            tracing::info!("task deleted");
            if self.config.compact_after_delete {
                self.engine.renumber(&guard).await?;
            }
        }
        Ok(removed)
    }

    /// Finds a task by identifier.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the lookup fails.
    pub async fn get_task(&self, owner: &OwnerId, id: TaskId) -> TaskServiceResult<Option<Task>> {
        Ok(self.store.get(owner, id).await?)
    }

    /// Lists active tasks in combined order: primary tasks by priority, then
    /// secondary tasks by priority.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the range read fails.
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub async fn list_active_tasks(
        &self,
        owner: &OwnerId,
        filter: &TaskFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        let mut tasks: Vec<Task> = self
            .store
            .list_active(owner)
            .await?
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect();
        tasks.sort_by_key(|task| (!task.is_primary(), task.priority()));
        Ok(tasks)
    }

    /// Lists every task of the owner, completed and canceled ones
    /// included, in creation order.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the range read fails.
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub async fn list_tasks(
        &self,
        owner: &OwnerId,
        filter: &TaskFilter,
    ) -> TaskServiceResult<Vec<Task>> {
        Ok(self
            .store
            .list(owner)
            .await?
            .into_iter()
            .filter(|task| filter.matches(task))
            .collect())
    }

    /// Recomputes the owner's ordering.
    ///
    /// With `moved`, the task keeps its sublist and moves to the zero-based
    /// combined position. Without it the pass only compacts the current
    /// order; running it twice in a row writes nothing the second time.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the pass fails.
    #[tracing::instrument(skip_all, fields(owner = %owner))]
    pub async fn reprioritize(
        &self,
        owner: &OwnerId,
        moved: Option<(TaskId, usize)>,
    ) -> TaskServiceResult<RenumberOutcome> {
        let guard = self.engine.lock(owner).await;
        let outcome = if let Some((id, position)) = moved {
            let is_primary = self
                .store
                .get(owner, id)
                .await?
                .is_some_and(|task| task.is_primary());
            self.engine
                .insert_or_move(&guard, id, is_primary, Placement::Combined(position))
                .await?
        } else {
            self.engine.renumber(&guard).await?
        };
        Ok(outcome)
    }

    /// Returns how many more primary tasks fit under `cap`.
    ///
    /// The engine never enforces a cap; callers that want one check here
    /// before promoting.
    ///
    /// # Errors
    ///
    /// Returns [`TaskServiceError::Store`] when the range read fails.
    pub async fn primary_slots_remaining(
        &self,
        owner: &OwnerId,
        cap: usize,
    ) -> TaskServiceResult<usize> {
        let primaries = self
            .store
            .list_active(owner)
            .await?
            .iter()
            .filter(|task| task.is_primary())
            .count();
        Ok(cap.saturating_sub(primaries))
    }

    fn apply_field_edit(&self, task: &mut Task, edit: TaskFieldEdit) {
        let clock = &*self.clock;
        let TaskFieldEdit {
            title,
            description,
            due_date,
            tags,
        } = edit;
        if let Some(value) = title {
            task.rename(value, clock);
        }
        if let Some(value) = description {
            task.describe(value, clock);
        }
        if let Some(value) = due_date {
            task.reschedule(value, clock);
        }
        if let Some(value) = tags {
            task.retag(value, clock);
        }
    }

    async fn reload(&self, guard: &OwnerGuard, id: TaskId) -> TaskServiceResult<Task> {
        self.store
            .get(guard.owner(), id)
            .await?
            .ok_or(TaskServiceError::Store(TaskStoreError::NotFound(id)))
    }
}

/// Resolves a promotion or demotion against the task's current sublist.
///
/// A sublist change without a rank appends; an unchanged sublist without a
/// rank needs no pass at all.
fn promotion_target(
    task: &Task,
    is_primary: bool,
    priority: Option<Priority>,
) -> Option<PlacementTarget> {
    match priority {
        Some(rank) => Some(PlacementTarget {
            is_primary,
            placement: Placement::Rank(rank),
        }),
        None if is_primary != task.is_primary() => Some(PlacementTarget {
            is_primary,
            placement: Placement::End,
        }),
        None => None,
    }
}
