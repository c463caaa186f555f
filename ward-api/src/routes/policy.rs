//! Policy management endpoints

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};
use ward_core::PolicySummary;
use ward_store::{NewPolicy, PolicyChanges};

use crate::dto::{CreatePolicyRequest, LinkWardRequest, PolicyResponse, UpdatePolicyRequest};
use crate::error::ApiResult;
use crate::state::AppState;

/// Create a policy; compiles the enforcement document
pub async fn create_policy(
    State(state): State<AppState>,
    Json(req): Json<CreatePolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state
        .policies
        .create_policy(NewPolicy {
            name: req.name,
            guardian_wallet_address: req.guardian_wallet_address,
            usd_limit: req.usd_limit,
            restrict_to_base: req.restrict_to_base,
            allowed_chains: req.allowed_chains,
            allowed_addresses: req.allowed_addresses,
        })
        .await?;
    Ok(Json(policy.into()))
}

/// Get a policy by id
pub async fn get_policy(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state.policies.get_policy(&policy_id).await?;
    Ok(Json(policy.into()))
}

/// List a guardian's policies
pub async fn list_policies(
    State(state): State<AppState>,
    Path(address): Path<String>,
) -> ApiResult<Json<Vec<PolicyResponse>>> {
    let policies = state.policies.list_policies(&address).await?;
    Ok(Json(policies.into_iter().map(Into::into).collect()))
}

/// Update configuration; recompiles and atomically replaces the
/// document
pub async fn update_policy(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
    Json(req): Json<UpdatePolicyRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state
        .policies
        .update_policy(
            &policy_id,
            PolicyChanges {
                name: req.name,
                usd_limit: req.usd_limit,
                clear_usd_limit: req.clear_usd_limit,
                restrict_to_base: req.restrict_to_base,
                allowed_chains: req.allowed_chains,
                allowed_addresses: req.allowed_addresses,
                clear_allowed_addresses: req.clear_allowed_addresses,
                is_active: req.is_active,
            },
        )
        .await?;
    Ok(Json(policy.into()))
}

/// Delete a policy and its ward link
pub async fn delete_policy(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
) -> ApiResult<Json<Value>> {
    state.policies.delete_policy(&policy_id).await?;
    Ok(Json(json!({ "policy_id": policy_id, "status": "deleted" })))
}

/// Link a ward wallet to this policy
pub async fn link_ward_wallet(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
    Json(req): Json<LinkWardRequest>,
) -> ApiResult<Json<PolicyResponse>> {
    let policy = state
        .policies
        .link_ward_wallet(&policy_id, &req.ward_wallet_address)
        .await?;
    Ok(Json(policy.into()))
}

/// Display summary (introspection output; never an enforcement input)
pub async fn get_summary(
    State(state): State<AppState>,
    Path(policy_id): Path<String>,
) -> ApiResult<Json<PolicySummary>> {
    let summary = state.policies.summarize_policy(&policy_id).await?;
    Ok(Json(summary))
}
