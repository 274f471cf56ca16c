//! Newtype wrappers for domain values
//!
//! The slot pool brands slot ownership with a thread identifier and reserves
//! the raw value 0 to mean "unowned". [`Tid`] makes that reservation a type
//! invariant instead of a runtime convention.

use std::fmt;
use std::num::NonZeroI32;

use super::errors::ThreadIdError;

/// Kernel thread identifier, guaranteed non-zero
///
/// Stable and unique for the lifetime of a thread. The raw value 0 is
/// reserved by the slot pool to mark a free slot and is unrepresentable here.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Tid(NonZeroI32);

impl Tid {
    /// Wrap a raw thread id, rejecting the reserved value 0
    pub fn from_raw(raw: i32) -> Result<Self, ThreadIdError> {
        NonZeroI32::new(raw).map(Tid).ok_or(ThreadIdError::Reserved)
    }

    pub(crate) const fn from_nonzero(raw: NonZeroI32) -> Self {
        Self(raw)
    }

    /// Raw id as stored in a slot's owner field
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0.get()
    }
}

impl fmt::Display for Tid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TID:{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_tid_is_rejected() {
        assert!(matches!(Tid::from_raw(0), Err(ThreadIdError::Reserved)));
    }

    #[test]
    fn nonzero_tid_round_trips() {
        let tid = Tid::from_raw(4321).unwrap();
        assert_eq!(tid.get(), 4321);
        assert_eq!(tid.to_string(), "TID:4321");
    }
}
