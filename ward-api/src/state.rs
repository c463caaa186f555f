//! Application state for the API server

use std::sync::Arc;
use ward_store::{MemoryPolicyStore, PolicyService, PolicyStore};

/// API server state
#[derive(Clone)]
pub struct AppState {
    /// Policy lifecycle and enforcement service
    pub policies: Arc<PolicyService>,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create app state over an arbitrary store
    pub fn new(store: Arc<dyn PolicyStore>, partner_id: &str) -> Self {
        Self {
            policies: Arc::new(PolicyService::new(store, partner_id)),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }

    /// Create app state over a fresh in-memory store
    pub fn in_memory(partner_id: &str) -> Self {
        Self::new(Arc::new(MemoryPolicyStore::new()), partner_id)
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    /// Partner id stamped on compiled documents
    pub partner_id: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            partner_id: ward_core::DEFAULT_PARTNER_ID.to_string(),
        }
    }
}
