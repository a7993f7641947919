//! Per-owner serialization of ordering passes.
//!
//! Every renumber pass reads an owner's whole active list and rewrites parts
//! of it, so two passes for the same owner must never interleave. Owners are
//! independent of each other.
//!
//! The guard is process-local. Several service instances sharing one store
//! need conditional writes at the store boundary on top of this.

use crate::task::domain::OwnerId;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, ready};
use tokio::sync::{Mutex as SlotMutex, OwnedMutexGuard};

type SlotMap = HashMap<OwnerId, Arc<SlotMutex<()>>>;

/// Registry of per-owner locks.
///
/// Slots are created on first use and evicted when the last holder or
/// waiter is gone, so the registry only ever holds owners with work in
/// flight. Waiters are served in arrival order. A waiter dropped before it
/// is served gives up its place and its share of the slot.
#[derive(Debug, Clone, Default)]
pub struct OwnerLocks {
    slots: Arc<Mutex<SlotMap>>,
}

impl OwnerLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Waits until `owner` is free and claims it.
    ///
    /// The claim lasts until the returned guard is dropped. Dropping the
    /// future while it waits leaves the registry as if it never queued.
    pub async fn acquire(&self, owner: &OwnerId) -> OwnerGuard {
        let slot = {
            let mut slots = self.slots.lock();
            Arc::clone(slots.entry(owner.clone()).or_default())
        };

        let held = if let Ok(held) = Arc::clone(&slot).try_lock_owned() {
            held
        } else {
            tracing::debug!(owner = %owner, "owner busy, queueing ordering request");
            QueuedClaim {
                owner: owner.clone(),
                slots: Arc::clone(&self.slots),
                wait: Some(Box::pin(slot.lock_owned())),
            }
            .await
        };

        OwnerGuard {
            owner: owner.clone(),
            held: Some(held),
            slots: Arc::clone(&self.slots),
        }
    }

    /// Returns `true` when `guard` was issued by this registry.
    #[must_use]
    pub fn issued(&self, guard: &OwnerGuard) -> bool {
        Arc::ptr_eq(&self.slots, &guard.slots)
    }

    /// Returns the number of owners with a held or awaited slot.
    #[must_use]
    pub fn pending_owners(&self) -> usize {
        self.slots.lock().len()
    }
}

/// Exclusive claim on one owner's task ordering.
///
/// Ordering passes take a guard reference, so a pass cannot run without
/// holding its owner's slot.
#[derive(Debug)]
pub struct OwnerGuard {
    owner: OwnerId,
    held: Option<OwnedMutexGuard<()>>,
    slots: Arc<Mutex<SlotMap>>,
}

impl OwnerGuard {
    /// Returns the owner this guard claims.
    #[must_use]
    pub const fn owner(&self) -> &OwnerId {
        &self.owner
    }
}

impl Drop for OwnerGuard {
    fn drop(&mut self) {
        let mut slots = self.slots.lock();
        drop(self.held.take());
        evict_if_idle(&mut slots, &self.owner);
    }
}

/// A queued wait for a busy slot.
///
/// Owns the pending lock future so that a cancelled waiter releases its
/// slot reference before the idle check runs.
struct QueuedClaim<F> {
    owner: OwnerId,
    slots: Arc<Mutex<SlotMap>>,
    wait: Option<Pin<Box<F>>>,
}

impl<F: Future> Future for QueuedClaim<F> {
    type Output = F::Output;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let Some(wait) = self.wait.as_mut() else {
            return Poll::Pending;
        };
        let held = ready!(wait.as_mut().poll(cx));
        self.wait = None;
        Poll::Ready(held)
    }
}

impl<F> Drop for QueuedClaim<F> {
    fn drop(&mut self) {
        // Settled claims hand their reference to the guard.
        if self.wait.is_none() {
            return;
        }
        let mut slots = self.slots.lock();
        drop(self.wait.take());
        tracing::debug!(owner = %self.owner, "queued ordering request abandoned");
        evict_if_idle(&mut slots, &self.owner);
    }
}

fn evict_if_idle(slots: &mut SlotMap, owner: &OwnerId) {
    // Only the registry itself still references an idle slot.
    let idle = slots
        .get(owner)
        .is_some_and(|slot| Arc::strong_count(slot) == 1);
    if idle {
        slots.remove(owner);
        tracing::debug!(owner = %owner, "evicted idle owner lock");
    }
}
