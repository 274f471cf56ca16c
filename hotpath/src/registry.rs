//! Call-site registry
//!
//! Maps an intercepted code address to its [`CallSiteRecord`] so the
//! dispatcher can decide, on every interception, which transaction operations
//! are legal at that site.
//!
//! ## Build-then-freeze
//!
//! All records are added during the single-threaded setup phase, strictly
//! before interception begins; the map is never mutated concurrently with
//! lookups. The registry performs no internal synchronization — the borrow
//! checker enforces the discipline (`add` takes `&mut self`, `lookup` takes
//! `&self`), and [`install`] freezes the process-wide instance behind a
//! one-time initialization barrier rather than a lock taken on every access.
//!
//! A lookup miss is the common case (most executed addresses are not
//! instrumented) and is a cheap `None`, not an error.

use hotpath_common::CallSiteRecord;
use once_cell::sync::OnceCell;
use rustc_hash::FxHashMap;
use std::fmt;

use crate::domain::RegistryError;

/// Registry of every instrumented call site in the target application
///
/// Deliberately compact: a target may carry thousands of call sites, and the
/// whole map has to stay cache-resident during high-frequency lookups.
#[derive(Default)]
pub struct CallSiteRegistry {
    map: FxHashMap<usize, CallSiteRecord>,
}

impl CallSiteRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a record keyed by its address
    ///
    /// Registering the same address twice is last-write-wins; keeping
    /// addresses unique is the patcher's responsibility at setup time.
    pub fn add(&mut self, record: CallSiteRecord) {
        self.map.insert(record.address(), record);
    }

    /// Look up the record for an address
    ///
    /// O(1), never allocates, never blocks. `None` for an uninstrumented
    /// address is a normal, frequent outcome.
    #[must_use]
    pub fn lookup(&self, address: usize) -> Option<&CallSiteRecord> {
        self.map.get(&address)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Iterate all registered records, in no particular order
    pub fn iter(&self) -> impl Iterator<Item = &CallSiteRecord> {
        self.map.values()
    }
}

impl fmt::Display for CallSiteRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for record in self.map.values() {
            writeln!(f, "{record}")?;
        }
        Ok(())
    }
}

// ============================================================================
// Process-wide installed registry
// ============================================================================

static INSTALLED: OnceCell<CallSiteRegistry> = OnceCell::new();

/// Freeze `registry` as the process-wide instance
///
/// Called once at the end of the setup phase. A second call fails and leaves
/// the first registry in place.
pub fn install(registry: CallSiteRegistry) -> Result<(), RegistryError> {
    let records = registry.len();
    if INSTALLED.set(registry).is_err() {
        return Err(RegistryError::AlreadyInstalled {
            existing: INSTALLED.get().map_or(0, CallSiteRegistry::len),
        });
    }
    log::debug!("installed call-site registry with {records} records");
    Ok(())
}

/// The installed registry, if setup has completed
#[must_use]
pub fn installed() -> Option<&'static CallSiteRegistry> {
    INSTALLED.get()
}

/// Look up `address` in the installed registry
///
/// The dispatcher's entry point on every interception.
#[must_use]
pub fn locate(address: usize) -> Option<&'static CallSiteRecord> {
    INSTALLED.get().and_then(|registry| registry.lookup(address))
}

#[cfg(test)]
mod tests {
    use super::*;
    use hotpath_common::{CallSiteAttr, ATTR_CAN_BEGIN_TXN, ATTR_CAN_END_TXN};

    fn record(address: usize, bits: u8, id: u32) -> CallSiteRecord {
        CallSiteRecord::new(address, CallSiteAttr::from_bits(bits), id)
    }

    #[test]
    fn lookup_returns_the_matching_record() {
        let mut registry = CallSiteRegistry::new();
        registry.add(record(0x1000, ATTR_CAN_BEGIN_TXN, 1));
        registry.add(record(0x2000, ATTR_CAN_END_TXN, 2));

        let found = registry.lookup(0x2000).unwrap();
        assert_eq!(found.id(), 2);
        assert!(found.can_end_txn());
        assert!(!found.can_begin_txn());
    }

    #[test]
    fn lookup_miss_is_a_plain_none() {
        let registry = CallSiteRegistry::new();
        assert!(registry.lookup(0xDEAD).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn duplicate_address_is_last_write_wins() {
        let mut registry = CallSiteRegistry::new();
        registry.add(record(0x1000, ATTR_CAN_BEGIN_TXN, 1));
        registry.add(record(0x1000, ATTR_CAN_END_TXN, 9));

        assert_eq!(registry.len(), 1);
        let found = registry.lookup(0x1000).unwrap();
        assert_eq!(found.id(), 9);
        assert!(found.can_end_txn());
    }

    #[test]
    fn display_lists_one_record_per_line() {
        let mut registry = CallSiteRegistry::new();
        registry.add(record(0x1000, ATTR_CAN_BEGIN_TXN, 1));
        registry.add(record(0x2000, ATTR_CAN_END_TXN, 2));

        let listing = registry.to_string();
        assert_eq!(listing.lines().count(), 2);
        assert!(listing.contains("0x1000"));
        assert!(listing.contains("0x2000"));
    }
}
