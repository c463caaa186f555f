//! Ward API Server
//!
//! REST surface over the Ward policy service.
//!
//! ## Endpoints
//!
//! ### Policy management
//! - POST /policies - Create policy (compiles the document)
//! - GET /policies/:policy_id - Get policy
//! - GET /policies/guardian/:address - List a guardian's policies
//! - PUT /policies/:policy_id - Update configuration (recompiles)
//! - DELETE /policies/:policy_id - Delete policy
//! - POST /policies/:policy_id/link - Link a ward wallet
//! - GET /policies/:policy_id/summary - Display summary
//!
//! ### Enforcement
//! - POST /wards/:address/authorize - Authoritative decision against
//!   the stored document
//! - POST /evaluate - Advisory pre-flight check against a
//!   caller-supplied document (same evaluator, not authoritative)

pub mod dto;
pub mod error;
pub mod routes;
pub mod server;
pub mod state;

pub use dto::*;
pub use error::*;
pub use routes::*;
pub use server::*;
pub use state::*;
