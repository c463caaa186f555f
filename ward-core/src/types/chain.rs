//! Chain identifiers

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::constants::BASE_CHAIN_ID;

/// Decimal-string chain identifier (e.g. "8453" for Base)
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ChainId(String);

impl ChainId {
    /// Creates a new chain identifier
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Base mainnet
    pub fn base() -> Self {
        Self(BASE_CHAIN_ID.to_string())
    }

    /// Returns the underlying string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ChainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ChainId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}
