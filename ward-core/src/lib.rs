//! Ward Core - guardian-managed wallet permission policies
//!
//! This crate provides the core data model and pure logic for Ward:
//! - Policy Document schema (Policy → Scope → Permission → Condition)
//! - Policy compiler: guardian configuration → Policy Document
//! - Transaction evaluator: candidate transaction → ALLOW/DENY decision
//! - Policy introspection: display-time summaries of a document
//!
//! Everything here is pure and synchronous. Storage, services and the
//! REST surface live in `ward-store` and `ward-api`.

pub mod compiler;
pub mod constants;
pub mod error;
pub mod evaluator;
pub mod introspect;
pub mod types;

pub use compiler::{compile, CompileOptions};
pub use constants::*;
pub use error::{PolicyError, PolicyResult};
pub use evaluator::{classify_action, evaluate, Evaluation, TransactionRequest};
pub use introspect::PolicySummary;
pub use types::*;
