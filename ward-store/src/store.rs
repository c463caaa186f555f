//! Policy store trait
//!
//! Keyed storage consulted by the enforcement path. All address keys
//! are lowercased; `WalletAddress` case-folds at parse time, so keys
//! derived from it are already normalized. Each operation is atomic
//! with respect to itself; no cross-key transactions are required.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use ward_core::{GuardianPolicy, PolicyDocument, WalletAddress, WardLink};

use crate::error::StoreResult;

/// Enforcement record: the authoritative document for a ward wallet
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnforcementRecord {
    /// Guardian owning the policy
    pub guardian_wallet_address: WalletAddress,
    /// The compiled document consulted at enforcement time
    pub policy: PolicyDocument,
    /// Whether the governing policy is active; inactive records deny
    pub is_active: bool,
}

/// Storage collaborator for policies, ward links and enforcement
/// records
#[async_trait]
pub trait PolicyStore: Send + Sync {
    /// Insert or replace a guardian policy
    async fn save_policy(&self, policy: &GuardianPolicy) -> StoreResult<()>;

    /// Fetch a policy by id
    async fn get_policy(&self, policy_id: &str) -> StoreResult<Option<GuardianPolicy>>;

    /// List policies owned by a guardian
    async fn list_policies_by_guardian(
        &self,
        guardian: &WalletAddress,
    ) -> StoreResult<Vec<GuardianPolicy>>;

    /// Delete a policy by id
    async fn delete_policy(&self, policy_id: &str) -> StoreResult<()>;

    /// Insert or replace a ward link
    async fn put_link(&self, link: &WardLink) -> StoreResult<()>;

    /// Resolve the link for a ward address
    async fn get_link(&self, ward_address: &WalletAddress) -> StoreResult<Option<WardLink>>;

    /// Remove the link for a ward address
    async fn delete_link(&self, ward_address: &WalletAddress) -> StoreResult<()>;

    /// Insert or replace the enforcement record for a ward address
    async fn put_enforcement(
        &self,
        ward_address: &WalletAddress,
        record: EnforcementRecord,
    ) -> StoreResult<()>;

    /// Fetch the enforcement record for a ward address
    async fn get_enforcement(
        &self,
        ward_address: &WalletAddress,
    ) -> StoreResult<Option<EnforcementRecord>>;

    /// Remove the enforcement record for a ward address
    async fn delete_enforcement(&self, ward_address: &WalletAddress) -> StoreResult<()>;
}
