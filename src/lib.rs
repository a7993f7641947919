//! Taskline: per-owner task lists with gap-free priority ordering.
//!
//! The crate keeps each owner's active tasks in two ranked sublists and
//! maintains contiguous priorities through every create, update, delete and
//! explicit reorder.
//!
//! # Architecture
//!
//! Taskline follows hexagonal architecture principles:
//!
//! - **Domain**: Pure task model, status rules and validation
//! - **Ports**: The [`task::ports::TaskStore`] contract
//! - **Adapters**: In-memory and `PostgreSQL` stores plus a timeout decorator
//! - **Services**: The ordering engine and task orchestration
//!
//! # Modules
//!
//! - [`task`]: Task model, storage and ordering

pub mod task;
