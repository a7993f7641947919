//! Per-owner task lists with contiguous, two-tier priority ordering.
//!
//! Every owner's active tasks split into a primary and a secondary sublist,
//! each numbered `1..=n` without gaps or duplicates. Creating, moving,
//! promoting, completing or re-opening a task triggers a renumber pass that
//! rewrites only the tasks whose placement changed. Passes for one owner are
//! serialized; owners never block each other. The module follows hexagonal
//! architecture:
//!
//! - Domain types in [`domain`]
//! - Port contracts in [`ports`]
//! - Adapter implementations in [`adapters`]
//! - Orchestration services in [`services`]

pub mod adapters;
pub mod domain;
pub mod ports;
pub mod services;

#[cfg(test)]
mod tests;
