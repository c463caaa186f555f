//! Wallet address newtype
//!
//! Blockchain addresses are case-insensitive but arrive typed
//! inconsistently. `WalletAddress` stores the lowercased form so that
//! every comparison and every store key is already case-folded.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::PolicyError;

/// A `0x`-prefixed 40-hex-digit wallet address, stored lowercased
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Parse and case-fold an address, rejecting malformed input
    pub fn parse(value: &str) -> Result<Self, PolicyError> {
        let hex = value
            .strip_prefix("0x")
            .or_else(|| value.strip_prefix("0X"))
            .ok_or_else(|| PolicyError::InvalidAddress(format!("missing 0x prefix: {value}")))?;

        if hex.len() != 40 {
            return Err(PolicyError::InvalidAddress(format!(
                "expected 40 hex digits, got {}: {value}",
                hex.len()
            )));
        }
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PolicyError::InvalidAddress(format!(
                "non-hex characters in address: {value}"
            )));
        }

        Ok(Self(value.to_ascii_lowercase()))
    }

    /// The lowercased string form
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for WalletAddress {
    type Error = PolicyError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<WalletAddress> for String {
    fn from(address: WalletAddress) -> Self {
        address.0
    }
}
