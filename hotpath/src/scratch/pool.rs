//! Fixed-capacity scratch pool and its scope guard
//!
//! Emulates dynamic allocation of thread-local data out of a fixed-size
//! process-wide array. Interception code runs in contexts where calling the
//! allocator is unsafe (possibly re-entered through it) or too slow, so
//! acquisition is a bounded scan over preallocated slots with at most one
//! compare-and-swap per free slot — no locks, no allocation, no blocking.
//!
//! The capacity bounds the number of *concurrently participating* distinct
//! threads, not total threads: a released slot is claimable by any thread.

use std::cell::{Ref, RefMut};
use std::marker::PhantomData;

use super::slot::ScopedSlot;
use crate::domain::Tid;
use crate::tid;

/// Fixed array of scratch slots, one claimable per participating thread
///
/// Capacity is chosen at compile time and should exceed the realistic number
/// of threads intercepting concurrently. Process-wide instances live in a
/// lazily-initialized static:
///
/// ```
/// use hotpath::SlotPool;
/// use once_cell::sync::Lazy;
///
/// #[derive(Default)]
/// struct Scratch {
///     pending_txn: u64,
/// }
///
/// static SCRATCH: Lazy<SlotPool<Scratch, 64>> = Lazy::new(SlotPool::new);
///
/// if let Some(handle) = SCRATCH.acquire_current() {
///     handle.payload_mut().pending_txn += 1;
/// }
/// ```
pub struct SlotPool<T, const MAX_SLOTS: usize> {
    slots: [ScopedSlot<T>; MAX_SLOTS],
}

impl<T: Default, const MAX_SLOTS: usize> SlotPool<T, MAX_SLOTS> {
    #[must_use]
    pub fn new() -> Self {
        Self { slots: std::array::from_fn(|_| ScopedSlot::new()) }
    }
}

impl<T: Default, const MAX_SLOTS: usize> Default for SlotPool<T, MAX_SLOTS> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, const MAX_SLOTS: usize> SlotPool<T, MAX_SLOTS> {
    #[must_use]
    pub const fn capacity(&self) -> usize {
        MAX_SLOTS
    }

    /// Acquire the calling thread's slot, claiming a free one if needed
    ///
    /// Two-phase policy:
    ///
    /// 1. **Reentrancy**: if a slot is already owned by `tid`, bind to it —
    ///    a thread re-entering instrumented code before an earlier scope
    ///    exits gets the same slot back.
    /// 2. **Claim**: CAS a free slot from 0 to `tid`; on a lost race, move on
    ///    to the next free slot rather than retrying.
    ///
    /// Returns `None` when every slot is owned by another thread. Exhaustion
    /// is an expected outcome: the caller skips whatever optional work the
    /// scratch state would have enabled. It never blocks and never panics.
    #[must_use]
    pub fn acquire(&self, tid: Tid) -> Option<SlotHandle<'_, T>> {
        for slot in &self.slots {
            if slot.is_owned_by(tid) {
                return Some(SlotHandle::bind(slot));
            }
        }
        for slot in &self.slots {
            if slot.try_claim(tid) {
                return Some(SlotHandle::bind(slot));
            }
        }
        log::trace!("scratch pool exhausted, all {MAX_SLOTS} slots owned");
        None
    }

    /// [`acquire`](Self::acquire) with the calling thread's own id
    #[must_use]
    pub fn acquire_current(&self) -> Option<SlotHandle<'_, T>> {
        self.acquire(tid::current())
    }

    /// Number of slots currently owned by some thread
    ///
    /// Diagnostic snapshot; racy by nature under concurrent acquires.
    #[must_use]
    pub fn in_use(&self) -> usize {
        self.slots.iter().filter(|slot| !slot.is_free()).count()
    }
}

/// Move-only scope guard over one acquired slot
///
/// Each live handle accounts for exactly one nested acquisition in its
/// slot's depth counter; dropping the handle releases it on every exit path.
/// When the last handle held by the owning thread drops, the slot becomes
/// claimable by any thread.
pub struct SlotHandle<'pool, T> {
    slot: &'pool ScopedSlot<T>,
    // Slot state beyond `owner` is unsynchronized; the handle must stay on
    // the thread that acquired it.
    _not_send: PhantomData<*const ()>,
}

impl<'pool, T> SlotHandle<'pool, T> {
    fn bind(slot: &'pool ScopedSlot<T>) -> Self {
        slot.bind();
        Self { slot, _not_send: PhantomData }
    }

    /// Read access to the slot's payload
    ///
    /// # Panics
    ///
    /// Panics if the payload is already mutably borrowed through another
    /// handle on this thread — a caller bug, not a recoverable condition.
    #[must_use]
    pub fn payload(&self) -> Ref<'_, T> {
        self.slot.payload().borrow()
    }

    /// Write access to the slot's payload
    ///
    /// # Panics
    ///
    /// Panics if the payload is already borrowed through another handle on
    /// this thread.
    #[must_use]
    pub fn payload_mut(&self) -> RefMut<'_, T> {
        self.slot.payload().borrow_mut()
    }

    /// Nested acquisitions currently outstanding on this slot
    #[must_use]
    pub fn depth(&self) -> i32 {
        self.slot.depth()
    }
}

impl<T> Drop for SlotHandle<'_, T> {
    fn drop(&mut self) {
        self.slot.release();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(raw: i32) -> Tid {
        Tid::from_raw(raw).unwrap()
    }

    #[derive(Default)]
    struct Scratch {
        value: u64,
    }

    #[test]
    fn acquire_claims_and_release_frees() {
        let pool: SlotPool<Scratch, 4> = SlotPool::new();
        assert_eq!(pool.in_use(), 0);

        let handle = pool.acquire(tid(101)).unwrap();
        assert_eq!(pool.in_use(), 1);
        assert_eq!(handle.depth(), 1);

        drop(handle);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn reentrant_acquire_binds_the_same_slot() {
        let pool: SlotPool<Scratch, 4> = SlotPool::new();

        let outer = pool.acquire(tid(101)).unwrap();
        outer.payload_mut().value = 42;

        let inner = pool.acquire(tid(101)).unwrap();
        // Same slot: one slot in use, depth 2, and the write is visible
        // through the nested handle.
        assert_eq!(pool.in_use(), 1);
        assert_eq!(inner.depth(), 2);
        assert_eq!(inner.payload().value, 42);

        drop(inner);
        assert_eq!(outer.depth(), 1);
        assert_eq!(pool.in_use(), 1);

        drop(outer);
        assert_eq!(pool.in_use(), 0);
    }

    #[test]
    fn exhausted_pool_returns_none_until_a_release() {
        let pool: SlotPool<Scratch, 2> = SlotPool::new();

        let first = pool.acquire(tid(101)).unwrap();
        let second = pool.acquire(tid(102)).unwrap();
        assert!(pool.acquire(tid(103)).is_none());

        drop(first);
        let third = pool.acquire(tid(103)).unwrap();
        assert_eq!(pool.in_use(), 2);

        drop(second);
        drop(third);
    }

    #[test]
    fn released_slot_is_reusable_by_a_different_owner() {
        let pool: SlotPool<Scratch, 1> = SlotPool::new();

        let handle = pool.acquire(tid(101)).unwrap();
        handle.payload_mut().value = 7;
        drop(handle);

        // Payload is reused, not reconstructed, across owners.
        let handle = pool.acquire(tid(102)).unwrap();
        assert_eq!(handle.payload().value, 7);
    }

    #[test]
    fn slot_stays_owned_until_all_nested_handles_drop() {
        let pool: SlotPool<Scratch, 1> = SlotPool::new();

        let outer = pool.acquire(tid(101)).unwrap();
        let inner = pool.acquire(tid(101)).unwrap();
        drop(outer);

        // Still owned: a different thread cannot claim it yet.
        assert!(pool.acquire(tid(102)).is_none());

        drop(inner);
        assert!(pool.acquire(tid(102)).is_some());
    }

    #[test]
    fn capacity_reports_the_compile_time_bound() {
        let pool: SlotPool<Scratch, 8> = SlotPool::new();
        assert_eq!(pool.capacity(), 8);
    }
}
