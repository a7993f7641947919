//! Domain model for prioritized task lists.
//!
//! Tasks belong to an owner and sit in either the primary or the secondary
//! sublist. The domain layer owns validation and status rules; ordering and
//! persistence live outside of it.

mod content;
mod error;
mod filter;
mod ids;
mod status;
mod task;
mod update;

pub use content::{normalize_tags, validate_description, validate_title};
pub use error::{ParseTaskStatusError, TaskDomainError};
pub use filter::TaskFilter;
pub use ids::{OwnerId, Priority, TaskId};
pub use status::TaskStatus;
pub use task::{NewTaskData, PersistedTaskData, Task};
pub use update::{Placement, TaskFieldEdit, TaskUpdate};
