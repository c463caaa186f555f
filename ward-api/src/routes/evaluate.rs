//! Enforcement endpoints
//!
//! Both endpoints run the same `ward_core::evaluate` implementation.
//! `/wards/:address/authorize` is the authoritative path: it fetches
//! the stored document and never trusts a client-supplied one.
//! `/evaluate` is an advisory pre-flight check for UX.

use axum::{
    extract::{Path, State},
    Json,
};
use ward_core::evaluate;

use crate::dto::{EvaluateRequest, EvaluationResponse};
use crate::error::{ApiError, ApiResult};
use crate::state::AppState;

/// Authoritative decision for a ward wallet's candidate transaction
pub async fn authorize(
    State(state): State<AppState>,
    Path(address): Path<String>,
    Json(req): Json<ward_core::TransactionRequest>,
) -> ApiResult<Json<EvaluationResponse>> {
    let evaluation = state.policies.authorize_transaction(&address, &req).await?;
    Ok(Json(evaluation.into()))
}

/// Advisory pre-flight check against a caller-supplied document
pub async fn evaluate_advisory(
    State(_state): State<AppState>,
    Json(req): Json<EvaluateRequest>,
) -> ApiResult<Json<EvaluationResponse>> {
    req.policy
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;
    req.transaction
        .validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let evaluation = evaluate(&req.policy, &req.transaction);
    Ok(Json(evaluation.into()))
}
