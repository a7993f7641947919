//! Request payloads accepted from ingress adapters.
//!
//! Requests carry raw caller input. The service validates them and turns
//! update requests into tagged [`TaskUpdate`] commands before touching the
//! store.

use super::TaskServiceConfig;
use crate::task::domain::{
    ParseTaskStatusError, Placement, Priority, TaskDomainError, TaskFieldEdit, TaskStatus,
    TaskUpdate, normalize_tags, validate_description, validate_title,
};
use chrono::{DateTime, Utc};
use thiserror::Error;

/// Errors raised while validating request payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RequestValidationError {
    /// A field failed domain validation.
    #[error(transparent)]
    Domain(#[from] TaskDomainError),
    /// The status string is not recognised.
    #[error(transparent)]
    InvalidStatus(#[from] ParseTaskStatusError),
}

/// Request payload for creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
    due_date: Option<DateTime<Utc>>,
    status: Option<String>,
    is_primary: Option<bool>,
    priority: Option<u32>,
    tags: Vec<String>,
    explicit_position: Option<usize>,
}

impl CreateTaskRequest {
    /// Creates a request with the required title.
    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: None,
            due_date: None,
            status: None,
            is_primary: None,
            priority: None,
            tags: Vec::new(),
            explicit_position: None,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: DateTime<Utc>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Sets the initial status from its textual form.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Chooses the primary or secondary sublist.
    #[must_use]
    pub const fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = Some(is_primary);
        self
    }

    /// Requests a 1-based combined priority: the task lands at combined
    /// position `priority - 1`, so a secondary task is first offset past
    /// the primary sublist.
    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Requests a zero-based combined position. Takes precedence over
    /// [`Self::with_priority`].
    #[must_use]
    pub const fn at_position(mut self, position: usize) -> Self {
        self.explicit_position = Some(position);
        self
    }

    pub(super) fn validate(
        self,
        config: &TaskServiceConfig,
    ) -> Result<ValidatedCreate, RequestValidationError> {
        let title = validate_title(&self.title, config.max_title_length)?;
        let description = self
            .description
            .as_deref()
            .map(|raw| validate_description(raw, config.max_description_length))
            .transpose()?
            .unwrap_or_default();
        let status = self
            .status
            .as_deref()
            .map(TaskStatus::try_from)
            .transpose()?
            .unwrap_or(TaskStatus::Open);
        let priority = self.priority.map(Priority::new).transpose()?;
        let tags = normalize_tags(&self.tags)?;

        let placement = match (self.explicit_position, priority) {
            (Some(position), _) => Placement::Combined(position),
            (None, Some(rank)) => Placement::Combined(rank.index()),
            (None, None) => Placement::End,
        };

        Ok(ValidatedCreate {
            title,
            description,
            due_date: self.due_date,
            status,
            is_primary: self.is_primary.unwrap_or(false),
            priority: priority.unwrap_or(Priority::FIRST),
            tags,
            placement,
        })
    }
}

/// Create request after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct ValidatedCreate {
    pub title: String,
    pub description: String,
    pub due_date: Option<DateTime<Utc>>,
    pub status: TaskStatus,
    pub is_primary: bool,
    pub priority: Priority,
    pub tags: std::collections::BTreeSet<String>,
    pub placement: Placement,
}

/// Request payload for a partial task update.
///
/// Unset fields stay unchanged. A position is never stored; it only drives
/// where the task lands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UpdateTaskRequest {
    title: Option<String>,
    description: Option<String>,
    due_date: Option<Option<DateTime<Utc>>>,
    tags: Option<Vec<String>>,
    status: Option<String>,
    is_primary: Option<bool>,
    priority: Option<u32>,
    position: Option<usize>,
}

impl UpdateTaskRequest {
    /// Creates an empty patch.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Replaces the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Sets or clears the due date.
    #[must_use]
    pub const fn with_due_date(mut self, due_date: Option<DateTime<Utc>>) -> Self {
        self.due_date = Some(due_date);
        self
    }

    /// Replaces the tag set.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = Some(tags.into_iter().collect());
        self
    }

    /// Changes the status, given in textual form.
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Moves the task into the primary or secondary sublist.
    #[must_use]
    pub const fn primary(mut self, is_primary: bool) -> Self {
        self.is_primary = Some(is_primary);
        self
    }

    /// Requests a 1-based rank within the task's sublist.
    #[must_use]
    pub const fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Requests a zero-based combined position.
    #[must_use]
    pub const fn at_position(mut self, position: usize) -> Self {
        self.position = Some(position);
        self
    }

    /// Classifies the patch into ordered commands: content first, then
    /// status, then at most one placement command.
    ///
    /// # Errors
    ///
    /// Returns [`RequestValidationError`] when any field is invalid.
    pub fn into_commands(
        self,
        config: &TaskServiceConfig,
    ) -> Result<Vec<TaskUpdate>, RequestValidationError> {
        let mut commands = Vec::new();

        let edit = TaskFieldEdit {
            title: self
                .title
                .as_deref()
                .map(|raw| validate_title(raw, config.max_title_length))
                .transpose()?,
            description: self
                .description
                .as_deref()
                .map(|raw| validate_description(raw, config.max_description_length))
                .transpose()?,
            due_date: self.due_date,
            tags: self.tags.as_ref().map(normalize_tags).transpose()?,
        };
        if !edit.is_empty() {
            commands.push(TaskUpdate::FieldEdit(edit));
        }

        if let Some(raw) = self.status.as_deref() {
            commands.push(TaskUpdate::StatusChange(TaskStatus::try_from(raw)?));
        }

        let priority = self.priority.map(Priority::new).transpose()?;
        let placement = match (self.position, self.is_primary, priority) {
            (Some(position), is_primary, _) => Some(TaskUpdate::PositionMove {
                placement: Placement::Combined(position),
                is_primary,
            }),
            (None, Some(is_primary), rank) => Some(TaskUpdate::PromotionDemotion {
                is_primary,
                priority: rank,
            }),
            (None, None, Some(rank)) => Some(TaskUpdate::PositionMove {
                placement: Placement::Rank(rank),
                is_primary: None,
            }),
            (None, None, None) => None,
        };
        commands.extend(placement);

        Ok(commands)
    }
}
