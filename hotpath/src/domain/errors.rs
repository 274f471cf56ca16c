//! Structured error types for hotpath
//!
//! Using thiserror for automatic Display implementation and error chaining.
//!
//! The hot path itself never surfaces these: a lookup miss and pool
//! exhaustion are plain `None` returns. Errors here cover the setup phase,
//! which runs single-threaded before interception begins.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("call-site registry already installed with {existing} records")]
    AlreadyInstalled { existing: usize },
}

#[derive(Error, Debug)]
pub enum ThreadIdError {
    #[error("thread id 0 is reserved to mark unowned slots")]
    Reserved,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registry_error_display() {
        let err = RegistryError::AlreadyInstalled { existing: 12 };
        assert_eq!(err.to_string(), "call-site registry already installed with 12 records");
    }

    #[test]
    fn test_thread_id_error_display() {
        assert!(ThreadIdError::Reserved.to_string().contains("reserved"));
    }
}
