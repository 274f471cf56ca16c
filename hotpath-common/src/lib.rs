//! # Shared Call-Site Records (patcher ↔ runtime core)
//!
//! Defines the compact data shared between the call-site patching subsystem
//! and the interception runtime. All types use `#[repr(C)]` with explicit
//! padding so the layout stays predictable and byte-compact — a target
//! application may carry thousands of instrumented call sites, and the whole
//! record table has to stay cache-resident during high-frequency lookups.
//!
//! ## Key Types
//!
//! - [`CallSiteAttr`] - Opaque bit-packed capability set for one call site
//! - [`CallSiteRecord`] - Address, capabilities and id of one call site
//!
//! The bit encoding behind [`CallSiteAttr`] is owned by the patching
//! subsystem; the runtime core only ever asks the five boolean questions.

#![no_std]

#[cfg(test)]
extern crate std;

use core::fmt;

// ============================================================================
// Capability Bits
// ============================================================================

/// Call site may attach user data to the recorded event
pub const ATTR_CAN_STORE_DATA: u8 = 1 << 0;

/// Call site may begin a transaction
pub const ATTR_CAN_BEGIN_TXN: u8 = 1 << 1;

/// Call site may suspend an in-flight transaction
pub const ATTR_CAN_SUSPEND_TXN: u8 = 1 << 2;

/// Call site may resume a suspended transaction
pub const ATTR_CAN_RESUME_TXN: u8 = 1 << 3;

/// Call site may end a transaction
pub const ATTR_CAN_END_TXN: u8 = 1 << 4;

// ============================================================================
// Shared Data Structures
// ============================================================================

/// Bit-packed capability set for a call site
///
/// Produced by the patching subsystem during instrumentation setup; the
/// runtime treats the value as opaque and only queries the five independent
/// capability flags. The dispatcher branches on these flags directly, so the
/// queries must stay trivially inlinable.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Default)]
pub struct CallSiteAttr(u8);

impl CallSiteAttr {
    /// Wrap a raw capability bitmask
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Raw bitmask, for handing back to the patching subsystem
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    #[must_use]
    pub const fn can_store_data(self) -> bool {
        self.0 & ATTR_CAN_STORE_DATA != 0
    }

    #[must_use]
    pub const fn can_begin_txn(self) -> bool {
        self.0 & ATTR_CAN_BEGIN_TXN != 0
    }

    #[must_use]
    pub const fn can_suspend_txn(self) -> bool {
        self.0 & ATTR_CAN_SUSPEND_TXN != 0
    }

    #[must_use]
    pub const fn can_resume_txn(self) -> bool {
        self.0 & ATTR_CAN_RESUME_TXN != 0
    }

    #[must_use]
    pub const fn can_end_txn(self) -> bool {
        self.0 & ATTR_CAN_END_TXN != 0
    }
}

impl fmt::Display for CallSiteAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (set, name) in [
            (self.can_store_data(), "can-store-data"),
            (self.can_begin_txn(), "can-begin-txn"),
            (self.can_suspend_txn(), "can-suspend-txn"),
            (self.can_resume_txn(), "can-resume-txn"),
            (self.can_end_txn(), "can-end-txn"),
        ] {
            if set {
                write!(f, "{sep}{name}")?;
                sep = " | ";
            }
        }
        if sep.is_empty() {
            write!(f, "none")?;
        }
        Ok(())
    }
}

impl fmt::Debug for CallSiteAttr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "CallSiteAttr({self})")
    }
}

/// Immutable metadata for one instrumented call site
///
/// Bound once during the single-threaded setup phase and never mutated
/// afterwards, so records are safe to share across intercepting threads
/// without synchronization.
///
/// **Memory Layout**: `#[repr(C)]`, 16 bytes on 64-bit targets
#[repr(C)]
#[derive(Clone, Copy, Debug)]
pub struct CallSiteRecord {
    /// Code address of the intercepted call site (identity key)
    pub address: usize,

    /// Small integer id, unique per registered call site
    ///
    /// Used for compact cross-referencing in the recording pipeline.
    pub id: u32,

    /// Capability set describing the actions legal at this call site
    pub attr: CallSiteAttr,

    /// Padding for 8-byte alignment
    #[allow(clippy::pub_underscore_fields)]
    pub _padding: [u8; 3],
}

impl CallSiteRecord {
    /// Bind an address, capability set and id into a record
    #[must_use]
    pub const fn new(address: usize, attr: CallSiteAttr, id: u32) -> Self {
        Self { address, id, attr, _padding: [0; 3] }
    }

    #[must_use]
    pub const fn address(&self) -> usize {
        self.address
    }

    #[must_use]
    pub const fn id(&self) -> u32 {
        self.id
    }

    #[must_use]
    pub const fn can_store_data(&self) -> bool {
        self.attr.can_store_data()
    }

    #[must_use]
    pub const fn can_begin_txn(&self) -> bool {
        self.attr.can_begin_txn()
    }

    #[must_use]
    pub const fn can_suspend_txn(&self) -> bool {
        self.attr.can_suspend_txn()
    }

    #[must_use]
    pub const fn can_resume_txn(&self) -> bool {
        self.attr.can_resume_txn()
    }

    #[must_use]
    pub const fn can_end_txn(&self) -> bool {
        self.attr.can_end_txn()
    }
}

impl fmt::Display for CallSiteRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "call site {:#x} | id {} | {}", self.address, self.id, self.attr)
    }
}
