//! Error types for Ward Store

use thiserror::Error;
use ward_core::PolicyError;

/// Store and service errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Policy not found: {0}")]
    PolicyNotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;
