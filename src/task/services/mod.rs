//! Application services for task ordering and lifecycle orchestration.

mod config;
mod guard;
mod lifecycle;
mod ordering;
mod planner;
mod requests;

pub use config::TaskServiceConfig;
pub use guard::{OwnerGuard, OwnerLocks};
pub use lifecycle::{TaskService, TaskServiceError, TaskServiceResult};
pub use ordering::{OrderingEngine, OrderingError, OrderingResult, RenumberOutcome};
pub use planner::{MoveRequest, PriorityChange, RenumberPlan, plan_renumber};
pub use requests::{CreateTaskRequest, RequestValidationError, UpdateTaskRequest};
