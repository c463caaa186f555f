//! API route handlers

pub mod evaluate;
pub mod health;
pub mod policy;

use axum::{
    routing::{get, post},
    Router,
};

use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        // Policy endpoints
        .route("/policies", post(policy::create_policy))
        .route(
            "/policies/:policy_id",
            get(policy::get_policy)
                .put(policy::update_policy)
                .delete(policy::delete_policy),
        )
        .route("/policies/:policy_id/link", post(policy::link_ward_wallet))
        .route("/policies/:policy_id/summary", get(policy::get_summary))
        .route("/policies/guardian/:address", get(policy::list_policies))
        // Enforcement endpoints
        .route("/wards/:address/authorize", post(evaluate::authorize))
        .route("/evaluate", post(evaluate::evaluate_advisory))
        // State
        .with_state(state)
}
