//! Tunables for the task service.

use serde::Deserialize;
use std::time::Duration;

/// Configuration for task validation and store access.
///
/// Hosts usually deserialize this from their own configuration file; every
/// field falls back to its default when absent.
///
/// # Examples
///
/// ```
/// use taskline::task::services::TaskServiceConfig;
///
/// let config = TaskServiceConfig::default();
/// assert_eq!(config.max_title_length, 200);
/// assert!(!config.compact_after_delete);
///
/// let strict = TaskServiceConfig::strict();
/// assert!(strict.max_title_length < config.max_title_length);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TaskServiceConfig {
    /// Maximum title length in characters.
    pub max_title_length: usize,
    /// Maximum description length in characters.
    pub max_description_length: usize,
    /// Time limit for each individual store call, in milliseconds.
    /// `None` disables the limit.
    pub store_timeout_ms: Option<u64>,
    /// Whether deleting a task compacts the remaining active priorities.
    pub compact_after_delete: bool,
}

impl Default for TaskServiceConfig {
    fn default() -> Self {
        Self {
            max_title_length: 200,
            max_description_length: 10_000,
            store_timeout_ms: Some(5_000),
            compact_after_delete: false,
        }
    }
}

impl TaskServiceConfig {
    /// Creates a strict configuration with reduced limits.
    ///
    /// Useful for latency-sensitive callers such as chat front ends.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            max_title_length: 120,
            max_description_length: 2_000,
            store_timeout_ms: Some(1_000),
            compact_after_delete: false,
        }
    }

    /// Returns the per-call store time limit.
    #[must_use]
    pub fn store_timeout(&self) -> Option<Duration> {
        self.store_timeout_ms.map(Duration::from_millis)
    }
}
