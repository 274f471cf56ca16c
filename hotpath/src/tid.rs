//! Platform thread-identifier primitive
//!
//! The slot pool tags ownership with the kernel thread id (`gettid`), which
//! is stable for the thread's lifetime, unique across live threads, and never
//! 0 — the value the pool reserves for "unowned".
//!
//! The syscall result is cached in a thread-local so the hot path pays one
//! TLS read instead of a syscall per acquisition.

use std::cell::Cell;
use std::num::NonZeroI32;

use crate::domain::Tid;

thread_local! {
    static CACHED_TID: Cell<Option<NonZeroI32>> = const { Cell::new(None) };
}

/// Thread id of the calling thread
#[must_use]
pub fn current() -> Tid {
    CACHED_TID.with(|cell| {
        if let Some(raw) = cell.get() {
            return Tid::from_nonzero(raw);
        }
        // gettid(2) cannot fail and never returns 0 for a live thread
        #[allow(unsafe_code)]
        let raw = unsafe { libc::gettid() };
        let raw = NonZeroI32::new(raw).expect("gettid returned the reserved id 0");
        cell.set(Some(raw));
        Tid::from_nonzero(raw)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn current_is_stable_within_a_thread() {
        assert_eq!(current(), current());
    }

    #[test]
    fn distinct_threads_see_distinct_tids() {
        let here = current();
        let there = std::thread::spawn(current).join().unwrap();
        assert_ne!(here, there);
    }
}
