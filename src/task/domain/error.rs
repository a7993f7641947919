//! Error types for task domain validation and parsing.

use super::TaskStatus;
use thiserror::Error;

/// Errors returned while constructing or mutating domain task values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TaskDomainError {
    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// The task title exceeds the configured limit.
    #[error("task title has {actual} characters, limit is {limit}")]
    TitleTooLong {
        /// Configured character limit.
        limit: usize,
        /// Observed character count.
        actual: usize,
    },

    /// The task description exceeds the configured limit.
    #[error("task description has {actual} characters, limit is {limit}")]
    DescriptionTooLong {
        /// Configured character limit.
        limit: usize,
        /// Observed character count.
        actual: usize,
    },

    /// Priorities are 1-based.
    #[error("invalid priority {0}, expected a positive integer")]
    InvalidPriority(u32),

    /// A tag is empty after trimming.
    #[error("task tags must not be empty")]
    EmptyTag,

    /// The owner identifier is empty after trimming.
    #[error("owner identifier must not be empty")]
    EmptyOwner,

    /// The requested status transition is not permitted.
    #[error("cannot transition task from {from} to {to}")]
    InvalidStatusTransition {
        /// Current status.
        from: TaskStatus,
        /// Requested status.
        to: TaskStatus,
    },
}

/// Error returned while parsing task statuses from input or persistence.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);
