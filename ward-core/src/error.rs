//! Error types for Ward Core
//!
//! Denial outcomes are values (`Evaluation { allowed: false, .. }`),
//! never errors. Errors here mean structurally invalid input.

use thiserror::Error;

use crate::types::{ActionType, Effect};

/// Ward Core errors
#[derive(Error, Debug)]
pub enum PolicyError {
    #[error("Invalid policy options: {0}")]
    InvalidPolicyOptions(String),

    #[error("Invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("Invalid condition: {0}")]
    InvalidCondition(String),

    #[error("Duplicate permission for chain {chain_id} ({action:?}, {effect:?})")]
    DuplicatePermission {
        chain_id: String,
        action: ActionType,
        effect: Effect,
    },

    #[error("Duplicate scope name: {0}")]
    DuplicateScope(String),

    #[error("Malformed transaction request: {0}")]
    MalformedTransaction(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Ward Core operations
pub type PolicyResult<T> = Result<T, PolicyError>;
