//! Task aggregate root.

use super::{OwnerId, Priority, TaskDomainError, TaskId, TaskStatus};
use chrono::{DateTime, Utc};
use mockable::Clock;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Validated content used to create a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTaskData {
    /// Owning user.
    pub owner: OwnerId,
    /// Trimmed, non-empty title.
    pub title: String,
    /// Free-form description.
    pub description: String,
    /// Initial status.
    pub status: TaskStatus,
    /// Whether the task starts in the primary sublist.
    pub is_primary: bool,
    /// Initial priority before any renumber pass.
    pub priority: Priority,
    /// Optional due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Normalized tags.
    pub tags: BTreeSet<String>,
}

/// Task aggregate root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    id: TaskId,
    owner: OwnerId,
    title: String,
    description: String,
    status: TaskStatus,
    is_primary: bool,
    priority: Priority,
    due_date: Option<DateTime<Utc>>,
    tags: BTreeSet<String>,
    created_at: DateTime<Utc>,
    modified_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

/// Parameter object for reconstructing a persisted task aggregate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PersistedTaskData {
    /// Persisted task identifier.
    pub id: TaskId,
    /// Persisted owner.
    pub owner: OwnerId,
    /// Persisted title.
    pub title: String,
    /// Persisted description.
    pub description: String,
    /// Persisted status.
    pub status: TaskStatus,
    /// Persisted sublist flag.
    pub is_primary: bool,
    /// Persisted priority.
    pub priority: Priority,
    /// Persisted due date.
    pub due_date: Option<DateTime<Utc>>,
    /// Persisted tags.
    pub tags: BTreeSet<String>,
    /// Persisted creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Persisted modification timestamp.
    pub modified_at: DateTime<Utc>,
    /// Persisted completion timestamp.
    pub completed_at: Option<DateTime<Utc>>,
}

impl Task {
    /// Creates a new task.
    ///
    /// A task created directly in [`TaskStatus::Completed`] gets its
    /// completion timestamp immediately.
    #[must_use]
    pub fn new(data: NewTaskData, clock: &impl Clock) -> Self {
        let timestamp = clock.utc();
        let completed_at = (data.status == TaskStatus::Completed).then_some(timestamp);
        Self {
            id: TaskId::new(),
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            is_primary: data.is_primary,
            priority: data.priority,
            due_date: data.due_date,
            tags: data.tags,
            created_at: timestamp,
            modified_at: timestamp,
            completed_at,
        }
    }

    /// Reconstructs a task from persisted storage.
    #[must_use]
    pub fn from_persisted(data: PersistedTaskData) -> Self {
        Self {
            id: data.id,
            owner: data.owner,
            title: data.title,
            description: data.description,
            status: data.status,
            is_primary: data.is_primary,
            priority: data.priority,
            due_date: data.due_date,
            tags: data.tags,
            created_at: data.created_at,
            modified_at: data.modified_at,
            completed_at: data.completed_at,
        }
    }

    /// Returns the task identifier.
    #[must_use]
    pub const fn id(&self) -> TaskId {
        self.id
    }

    /// Returns the owning user.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }

    /// Returns the title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the workflow status.
    #[must_use]
    pub const fn status(&self) -> TaskStatus {
        self.status
    }

    /// Returns `true` when the task takes part in ordering.
    #[must_use]
    pub const fn is_active(&self) -> bool {
        self.status.is_active()
    }

    /// Returns `true` when the task sits in the primary sublist.
    #[must_use]
    pub const fn is_primary(&self) -> bool {
        self.is_primary
    }

    /// Returns the 1-based priority within the task's sublist.
    #[must_use]
    pub const fn priority(&self) -> Priority {
        self.priority
    }

    /// Returns the due date, if any.
    #[must_use]
    pub const fn due_date(&self) -> Option<DateTime<Utc>> {
        self.due_date
    }

    /// Returns the tag set.
    #[must_use]
    pub const fn tags(&self) -> &BTreeSet<String> {
        &self.tags
    }

    /// Returns the creation timestamp.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns the latest modification timestamp.
    #[must_use]
    pub const fn modified_at(&self) -> DateTime<Utc> {
        self.modified_at
    }

    /// Returns the completion timestamp. Set only while completed.
    #[must_use]
    pub const fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completed_at
    }

    /// Replaces the title with an already validated value.
    pub fn rename(&mut self, title: String, clock: &impl Clock) {
        self.title = title;
        self.touch(clock);
    }

    /// Replaces the description with an already validated value.
    pub fn describe(&mut self, description: String, clock: &impl Clock) {
        self.description = description;
        self.touch(clock);
    }

    /// Sets or clears the due date.
    pub fn reschedule(&mut self, due_date: Option<DateTime<Utc>>, clock: &impl Clock) {
        self.due_date = due_date;
        self.touch(clock);
    }

    /// Replaces the tag set with already normalized tags.
    pub fn retag(&mut self, tags: BTreeSet<String>, clock: &impl Clock) {
        self.tags = tags;
        self.touch(clock);
    }

    /// Moves the task to another status.
    ///
    /// `completed_at` is set on entry to [`TaskStatus::Completed`] and
    /// cleared on any exit from it. Re-applying the current status leaves
    /// the timestamps untouched.
    ///
    /// # Errors
    ///
    /// Returns [`TaskDomainError::InvalidStatusTransition`] when the move is
    /// not allowed (leaving [`TaskStatus::Canceled`]).
    pub fn transition_to(
        &mut self,
        target: TaskStatus,
        clock: &impl Clock,
    ) -> Result<(), TaskDomainError> {
        if !self.status.can_transition_to(target) {
            return Err(TaskDomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        if self.status == target {
            return Ok(());
        }

        let timestamp = clock.utc();
        self.completed_at = (target == TaskStatus::Completed).then_some(timestamp);
        self.status = target;
        self.modified_at = timestamp;
        Ok(())
    }

    /// Applies a placement computed by a renumber pass.
    ///
    /// Placement is bookkeeping, so the modification timestamp is kept.
    pub const fn place(&mut self, is_primary: bool, priority: Priority) {
        self.is_primary = is_primary;
        self.priority = priority;
    }

    /// Updates the `modified_at` timestamp to the current clock time.
    fn touch(&mut self, clock: &impl Clock) {
        self.modified_at = clock.utc();
    }
}
