//! Task status and the transitions permitted between statuses.

use super::ParseTaskStatusError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task workflow status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Task has been captured but not started.
    Open,
    /// Task is being worked on.
    InProgress,
    /// Task is finished.
    Completed,
    /// Task is blocked on someone or something else.
    Waiting,
    /// Task has been dropped.
    Canceled,
}

impl TaskStatus {
    /// Every status, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Open,
        Self::InProgress,
        Self::Completed,
        Self::Waiting,
        Self::Canceled,
    ];

    /// Returns the canonical storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Waiting => "waiting",
            Self::Canceled => "canceled",
        }
    }

    /// Returns `true` when tasks in this status take part in ordering.
    #[must_use]
    pub const fn is_active(self) -> bool {
        !matches!(self, Self::Completed | Self::Canceled)
    }

    /// Returns `true` when a task may move from `self` to `target`.
    ///
    /// Staying in the same status is always allowed. `Canceled` is terminal.
    #[must_use]
    pub const fn can_transition_to(self, target: Self) -> bool {
        if self as u8 == target as u8 {
            return true;
        }
        match (self, target) {
            (Self::Canceled, _) => false,
            (_, Self::Canceled) => true,
            (Self::Open | Self::InProgress | Self::Waiting | Self::Completed, _) => true,
        }
    }
}

impl fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl TryFrom<&str> for TaskStatus {
    type Error = ParseTaskStatusError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let normalized = value.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        match normalized.as_str() {
            "open" => Ok(Self::Open),
            "in_progress" | "inprogress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            "waiting" => Ok(Self::Waiting),
            "canceled" | "cancelled" => Ok(Self::Canceled),
            _ => Err(ParseTaskStatusError(value.to_owned())),
        }
    }
}
