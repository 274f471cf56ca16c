//! One entry of the scratch pool
//!
//! A slot cycles between "free" (`owner == 0`) and "owned by thread X". The
//! only cross-thread synchronization is on the `owner` field; `depth` and the
//! payload are touched exclusively by whichever thread currently owns the
//! slot, so they need no atomicity of their own.

use std::cell::{Cell, RefCell};
use std::sync::atomic::{AtomicI32, Ordering};

use crate::domain::Tid;

/// A preallocated per-thread scratch cell
///
/// Invariants: `owner == 0` exactly when `depth == 0`; `depth >= 0`; at most
/// one thread id is recorded as owner at any instant. The payload is
/// default-constructed once and reused across owners without teardown.
pub(crate) struct ScopedSlot<T> {
    /// Owning thread's id; 0 means free
    owner: AtomicI32,

    /// Nested acquisitions by the current owner
    depth: Cell<i32>,

    payload: RefCell<T>,
}

// SAFETY: `depth` and `payload` are only accessed by the thread recorded in
// `owner`. Ownership hand-off between threads goes through the Acquire CAS in
// `try_claim` paired with the Release store in `release`, which gives the new
// owner a happens-before edge over the previous owner's writes.
#[allow(unsafe_code)]
unsafe impl<T: Send> Sync for ScopedSlot<T> {}

impl<T: Default> ScopedSlot<T> {
    pub(crate) fn new() -> Self {
        Self { owner: AtomicI32::new(0), depth: Cell::new(0), payload: RefCell::new(T::default()) }
    }
}

impl<T> ScopedSlot<T> {
    /// Does the calling thread already own this slot?
    ///
    /// Relaxed is enough: a thread can only observe its own prior store of
    /// its own id here.
    pub(crate) fn is_owned_by(&self, tid: Tid) -> bool {
        self.owner.load(Ordering::Relaxed) == tid.get()
    }

    /// Try to claim a free slot for `tid`; first CAS winner takes it
    pub(crate) fn try_claim(&self, tid: Tid) -> bool {
        self.owner.compare_exchange(0, tid.get(), Ordering::Acquire, Ordering::Relaxed).is_ok()
    }

    /// Record one more nested acquisition by the owner
    ///
    /// No atomics: only the thread that owns (or just claimed) the slot can
    /// reach this.
    pub(crate) fn bind(&self) {
        debug_assert!(self.depth.get() >= 0);
        self.depth.set(self.depth.get() + 1);
    }

    /// Drop one nested acquisition; the last one frees the slot
    pub(crate) fn release(&self) {
        let depth = self.depth.get();
        debug_assert!(depth > 0, "release of a slot with no outstanding handle");
        self.depth.set(depth - 1);
        if depth == 1 {
            self.owner.store(0, Ordering::Release);
        }
    }

    pub(crate) fn depth(&self) -> i32 {
        self.depth.get()
    }

    pub(crate) fn payload(&self) -> &RefCell<T> {
        &self.payload
    }

    pub(crate) fn is_free(&self) -> bool {
        self.owner.load(Ordering::Relaxed) == 0
    }
}
