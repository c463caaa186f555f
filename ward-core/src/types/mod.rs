//! Core types for Ward
//!
//! - `address`: wallet address newtype (lowercased, format-checked)
//! - `chain`: decimal-string chain id newtype
//! - `document`: the compiled Policy Document schema
//! - `policy`: the guardian-facing aggregate and ward link record

mod address;
mod chain;
mod document;
mod policy;

pub use address::*;
pub use chain::*;
pub use document::*;
pub use policy::*;
