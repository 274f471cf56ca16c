//! # Hotpath - Call-Site Interception Runtime Core
//!
//! Hotpath is the runtime core of a low-overhead instrumentation layer that
//! intercepts call sites inside a running target application to record
//! timing/transaction events. It answers exactly two questions on every
//! interception, without ever allocating, blocking, or taking a kernel lock:
//! *what is this call site allowed to do*, and *where is this thread's
//! private scratch slot*.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                      Target Application                         │
//! │                 (patched/redirected call sites)                 │
//! └───────────────────────┬─────────────────────────────────────────┘
//!                         │ intercepted calls
//!                         ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                 Interception Dispatcher (caller)                │
//! └────────────┬───────────────────────────────────────┬────────────┘
//!              │ locate(address)                       │ acquire(tid)
//!              ▼                                       ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Hotpath (This Crate)                        │
//! │                                                                 │
//! │  ┌────────────────────┐            ┌────────────────────┐      │
//! │  │ CallSiteRegistry   │            │ SlotPool           │      │
//! │  │ (build-then-freeze)│            │ (lock-free slots)  │      │
//! │  └─────────┬──────────┘            └─────────┬──────────┘      │
//! │            ▼                                 ▼                  │
//! │  ┌────────────────────┐            ┌────────────────────┐      │
//! │  │ CallSiteRecord     │            │ SlotHandle         │      │
//! │  │ (capability flags) │            │ (scoped payload)   │      │
//! │  └────────────────────┘            └────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Structure
//!
//! - [`registry`]: Address → record map, populated single-threaded at setup,
//!   read concurrently for the rest of process life
//!   - `install`/`locate`: the process-wide frozen instance
//!
//! - [`scratch`]: Fixed-capacity slot pool emulating per-thread dynamic
//!   allocation
//!   - Two-phase acquire: reentrancy scan, then CAS claim of a free slot
//!   - Exhaustion degrades gracefully (`None`), it never blocks
//!
//! - [`domain`]: Newtypes ([`Tid`]) and structured errors
//!
//! - [`tid`]: Cached kernel thread ids; 0 is reserved for "unowned"
//!
//! The compact `#[repr(C)]` records shared with the call-site patching
//! subsystem live in the `hotpath-common` crate.
//!
//! ## What stays outside
//!
//! Patching call sites, encoding capability bits, recording transactions and
//! session lifecycle all belong to collaborating subsystems. This core never
//! decides *what* to record.

pub mod domain;
pub mod registry;
pub mod scratch;
pub mod tid;

// Re-export the dispatcher-facing surface
pub use domain::{RegistryError, ThreadIdError, Tid};
pub use hotpath_common::{CallSiteAttr, CallSiteRecord};
pub use registry::{install, installed, locate, CallSiteRegistry};
pub use scratch::{SlotHandle, SlotPool};
