//! Per-thread scratch state without the allocator
//!
//! Core modules of the slot pool:
//! - `slot`: one pool entry and its ownership protocol
//! - `pool`: the fixed-capacity pool and the scope-guard handle
//!
//! Interception code asks the pool for the calling thread's slot and keeps
//! private mutable state in it for the duration of the scope, nested re-entry
//! included.

mod pool;
mod slot;

// Re-export the public surface; slots themselves are pool-internal
pub use pool::{SlotHandle, SlotPool};
