//! Ward Store - policy persistence and lifecycle services
//!
//! The store collaborator behind the Ward core: a `PolicyStore` trait
//! keyed by lowercased wallet addresses and policy ids, a thread-safe
//! in-memory implementation, and the `PolicyService` that owns the
//! guardian policy lifecycle (create, recompile-and-replace updates,
//! ward linkage, deletion) plus the authoritative enforcement-time
//! evaluation path.

pub mod error;
pub mod memory;
pub mod service;
pub mod store;

pub use error::{StoreError, StoreResult};
pub use memory::MemoryPolicyStore;
pub use service::{NewPolicy, PolicyChanges, PolicyService};
pub use store::{EnforcementRecord, PolicyStore};
