//! Adapter implementations for the task store port.

pub mod memory;
pub mod postgres;

mod timeout;

pub use timeout::TimeoutTaskStore;
