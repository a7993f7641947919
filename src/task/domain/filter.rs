//! Filters applied when listing an owner's active tasks.

use super::{Task, TaskStatus};
use chrono::{DateTime, Utc};

/// Criteria for narrowing an active task listing.
///
/// Empty criteria match everything.
///
/// # Examples
///
/// ```
/// use taskline::task::domain::{TaskFilter, TaskStatus};
///
/// let filter = TaskFilter::new()
///     .with_statuses([TaskStatus::Open, TaskStatus::Waiting])
///     .with_search("invoice");
/// assert_eq!(filter.statuses().len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    statuses: Vec<TaskStatus>,
    tags: Vec<String>,
    search: Option<String>,
    due_range: Option<(DateTime<Utc>, DateTime<Utc>)>,
}

impl TaskFilter {
    /// Creates a filter that matches every task.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Keeps tasks in any of the given statuses.
    #[must_use]
    pub fn with_statuses(mut self, statuses: impl IntoIterator<Item = TaskStatus>) -> Self {
        self.statuses = statuses.into_iter().collect();
        self
    }

    /// Keeps tasks carrying every one of the given tags.
    #[must_use]
    pub fn with_tags(mut self, tags: impl IntoIterator<Item = String>) -> Self {
        self.tags = tags.into_iter().collect();
        self
    }

    /// Keeps tasks whose title or description contains `needle`,
    /// ignoring case.
    #[must_use]
    pub fn with_search(mut self, needle: impl Into<String>) -> Self {
        let lowered = needle.into().trim().to_lowercase();
        self.search = (!lowered.is_empty()).then_some(lowered);
        self
    }

    /// Keeps tasks due within `[from, to]`. Undated tasks are dropped.
    #[must_use]
    pub const fn with_due_range(mut self, from: DateTime<Utc>, to: DateTime<Utc>) -> Self {
        self.due_range = Some((from, to));
        self
    }

    /// Returns the status criteria.
    #[must_use]
    pub fn statuses(&self) -> &[TaskStatus] {
        &self.statuses
    }

    /// Returns `true` when `task` satisfies every criterion.
    #[must_use]
    pub fn matches(&self, task: &Task) -> bool {
        self.matches_status(task)
            && self.matches_tags(task)
            && self.matches_search(task)
            && self.matches_due_range(task)
    }

    fn matches_status(&self, task: &Task) -> bool {
        self.statuses.is_empty() || self.statuses.contains(&task.status())
    }

    fn matches_tags(&self, task: &Task) -> bool {
        self.tags.iter().all(|tag| task.tags().contains(tag))
    }

    fn matches_search(&self, task: &Task) -> bool {
        self.search.as_ref().is_none_or(|needle| {
            task.title().to_lowercase().contains(needle.as_str())
                || task.description().to_lowercase().contains(needle.as_str())
        })
    }

    fn matches_due_range(&self, task: &Task) -> bool {
        self.due_range.is_none_or(|(from, to)| {
            task.due_date()
                .is_some_and(|due| due >= from && due <= to)
        })
    }
}
