//! Data Transfer Objects for API requests and responses

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use ward_core::{
    ActionType, ChainId, Evaluation, GuardianPolicy, PolicyDocument, TransactionRequest,
};

// ============ Policy DTOs ============

/// Create policy request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePolicyRequest {
    /// Display name for the policy
    pub name: String,
    /// Guardian wallet address (0x + 40 hex)
    pub guardian_wallet_address: String,
    /// USD spend cap (strictly positive)
    pub usd_limit: Option<f64>,
    /// Restrict all activity to Base
    #[serde(default)]
    pub restrict_to_base: bool,
    /// Explicit chain set (decimal-string chain ids)
    pub allowed_chains: Option<Vec<String>>,
    /// Recipient allowlist
    pub allowed_addresses: Option<Vec<String>>,
}

/// Update policy request; omitted fields stay unchanged
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePolicyRequest {
    pub name: Option<String>,
    pub usd_limit: Option<f64>,
    /// Remove the spend cap entirely
    #[serde(default)]
    pub clear_usd_limit: bool,
    pub restrict_to_base: Option<bool>,
    pub allowed_chains: Option<Vec<String>>,
    pub allowed_addresses: Option<Vec<String>>,
    /// Remove the allowlist entirely
    #[serde(default)]
    pub clear_allowed_addresses: bool,
    pub is_active: Option<bool>,
}

/// Link ward wallet request
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkWardRequest {
    /// Ward wallet address to govern with this policy
    pub ward_wallet_address: String,
}

/// Policy response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyResponse {
    pub id: String,
    pub name: String,
    pub guardian_wallet_address: String,
    pub ward_wallet_address: Option<String>,
    pub usd_limit: Option<f64>,
    pub restrict_to_base: bool,
    pub allowed_chains: BTreeSet<ChainId>,
    pub allowed_addresses: Option<Vec<String>>,
    pub blocked_actions: BTreeSet<ActionType>,
    pub is_active: bool,
    pub compiled_document: Option<PolicyDocument>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<GuardianPolicy> for PolicyResponse {
    fn from(policy: GuardianPolicy) -> Self {
        Self {
            id: policy.id,
            name: policy.name,
            guardian_wallet_address: policy.guardian_wallet_address.to_string(),
            ward_wallet_address: policy.ward_wallet_address.map(|a| a.to_string()),
            usd_limit: policy.usd_limit,
            restrict_to_base: policy.restrict_to_base,
            allowed_chains: policy.allowed_chains,
            allowed_addresses: policy
                .allowed_addresses
                .map(|set| set.iter().map(|a| a.to_string()).collect()),
            blocked_actions: policy.blocked_actions,
            is_active: policy.is_active,
            compiled_document: policy.compiled_document,
            created_at: policy.created_at,
            updated_at: policy.updated_at,
        }
    }
}

// ============ Evaluation DTOs ============

/// Advisory evaluation request: caller supplies both document and
/// transaction. The authoritative path (`/wards/:address/authorize`)
/// never trusts a client-supplied document.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluateRequest {
    pub policy: PolicyDocument,
    pub transaction: TransactionRequest,
}

/// Evaluation response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResponse {
    pub allowed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matched_condition: Option<String>,
}

impl From<Evaluation> for EvaluationResponse {
    fn from(evaluation: Evaluation) -> Self {
        Self {
            allowed: evaluation.allowed,
            reason: evaluation.reason,
            matched_condition: evaluation.matched_condition,
        }
    }
}
