//! Guardian policy aggregate and ward link record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{ActionType, ChainId, PolicyDocument, WalletAddress};

/// Guardian-facing policy record
///
/// The configuration a guardian authored plus the document it compiled
/// to. Every configuration change recompiles and replaces
/// `compiled_document` in one step; a failed recompilation must leave
/// the previous document untouched.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GuardianPolicy {
    /// Unique policy identifier
    pub id: String,
    /// Guardian-chosen display name
    pub name: String,
    /// Guardian (parent) wallet address
    pub guardian_wallet_address: WalletAddress,
    /// Linked ward (child) wallet address, once a wallet exists
    pub ward_wallet_address: Option<WalletAddress>,
    /// USD spend cap; the limit is exclusive at evaluation time
    pub usd_limit: Option<f64>,
    /// Restrict all activity to Base
    pub restrict_to_base: bool,
    /// Explicit chain set (ignored when `restrict_to_base`)
    pub allowed_chains: BTreeSet<ChainId>,
    /// Recipient allowlist
    pub allowed_addresses: Option<BTreeSet<WalletAddress>>,
    /// Action types blocked by the required security scopes
    pub blocked_actions: BTreeSet<ActionType>,
    /// Whether the policy is active
    pub is_active: bool,
    /// Compiled enforcement document
    pub compiled_document: Option<PolicyDocument>,
    /// When the policy was created
    pub created_at: DateTime<Utc>,
    /// When the policy was last updated
    pub updated_at: DateTime<Utc>,
}

impl GuardianPolicy {
    /// Action types every policy blocks, regardless of configuration
    pub fn default_blocked_actions() -> BTreeSet<ActionType> {
        BTreeSet::from([ActionType::DeployContract, ActionType::SmartContract])
    }
}

/// Ward link record: maps a ward wallet address to the policy
/// governing it
///
/// The key is always the lowercased ward address; `WalletAddress`
/// guarantees that at parse time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WardLink {
    /// Ward wallet address (lowercased lookup key)
    pub ward_address: WalletAddress,
    /// Policy governing the ward wallet
    pub policy_id: String,
    /// Guardian owning the policy
    pub guardian_wallet_address: WalletAddress,
}
