//! Health endpoints

use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// Liveness check
pub async fn health_check(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "version": state.version,
    }))
}

/// Readiness check
pub async fn ready_check() -> Json<Value> {
    Json(json!({ "status": "ready" }))
}
