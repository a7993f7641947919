//! Tagged update commands.
//!
//! A raw patch may touch content, status and placement at once. Services
//! classify it into these commands and match on them exhaustively.

use super::{Priority, TaskStatus};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;

/// Validated content edits. `None` leaves the field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFieldEdit {
    /// Replacement title.
    pub title: Option<String>,
    /// Replacement description.
    pub description: Option<String>,
    /// Replacement due date; `Some(None)` clears it.
    pub due_date: Option<Option<DateTime<Utc>>>,
    /// Replacement tag set.
    pub tags: Option<BTreeSet<String>>,
}

impl TaskFieldEdit {
    /// Returns `true` when no field would change.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.due_date.is_none()
            && self.tags.is_none()
    }
}

/// Where a task should land inside its target sublist.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Placement {
    /// Zero-based index into the primary sublist followed by the secondary
    /// sublist.
    Combined(usize),
    /// 1-based rank within the target sublist.
    Rank(Priority),
    /// After the last task of the target sublist.
    End,
}

impl Placement {
    /// Resolves the insertion offset inside the target sublist.
    ///
    /// `primary_len` and `secondary_len` are the sublist lengths with the
    /// moved task already removed. Out-of-range requests clamp to the end.
    #[must_use]
    pub fn offset(self, is_primary: bool, primary_len: usize, secondary_len: usize) -> usize {
        let target_len = if is_primary { primary_len } else { secondary_len };
        let requested = match self {
            Self::Combined(position) if is_primary => position,
            Self::Combined(position) => position.saturating_sub(primary_len),
            Self::Rank(priority) => priority.index(),
            Self::End => target_len,
        };
        requested.min(target_len)
    }
}

/// A single classified change to a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskUpdate {
    /// Plain content edit; never affects ordering.
    FieldEdit(TaskFieldEdit),
    /// Workflow status change.
    StatusChange(TaskStatus),
    /// Explicit move, optionally switching sublist.
    PositionMove {
        /// Requested landing spot.
        placement: Placement,
        /// Target sublist; `None` keeps the current one.
        is_primary: Option<bool>,
    },
    /// Promotion into or demotion out of the primary sublist.
    PromotionDemotion {
        /// Target sublist.
        is_primary: bool,
        /// Desired rank in the target sublist; `None` appends.
        priority: Option<Priority>,
    },
}
