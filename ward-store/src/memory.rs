//! In-memory policy store
//!
//! Thread-safe, RwLock-protected implementation of `PolicyStore`.
//! Suitable for tests, development, and as the default backing store;
//! production deployments swap in an external key-value store behind
//! the same trait.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use ward_core::{GuardianPolicy, WalletAddress, WardLink};

use crate::error::StoreResult;
use crate::store::{EnforcementRecord, PolicyStore};

/// In-memory store with a guardian index
#[derive(Debug, Default)]
pub struct MemoryPolicyStore {
    policies: Arc<RwLock<HashMap<String, GuardianPolicy>>>,
    links: Arc<RwLock<HashMap<String, WardLink>>>,
    enforcement: Arc<RwLock<HashMap<String, EnforcementRecord>>>,
    // guardian address -> policy ids
    guardian_index: Arc<RwLock<HashMap<String, Vec<String>>>>,
}

impl MemoryPolicyStore {
    /// Creates an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears all data
    pub async fn clear(&self) {
        self.policies.write().await.clear();
        self.links.write().await.clear();
        self.enforcement.write().await.clear();
        self.guardian_index.write().await.clear();
    }
}

#[async_trait]
impl PolicyStore for MemoryPolicyStore {
    async fn save_policy(&self, policy: &GuardianPolicy) -> StoreResult<()> {
        let mut policies = self.policies.write().await;
        let previous = policies.insert(policy.id.clone(), policy.clone());

        if previous.is_none() {
            let mut index = self.guardian_index.write().await;
            index
                .entry(policy.guardian_wallet_address.as_str().to_string())
                .or_default()
                .push(policy.id.clone());
        }
        Ok(())
    }

    async fn get_policy(&self, policy_id: &str) -> StoreResult<Option<GuardianPolicy>> {
        let policies = self.policies.read().await;
        Ok(policies.get(policy_id).cloned())
    }

    async fn list_policies_by_guardian(
        &self,
        guardian: &WalletAddress,
    ) -> StoreResult<Vec<GuardianPolicy>> {
        let index = self.guardian_index.read().await;
        let policies = self.policies.read().await;
        let ids = index.get(guardian.as_str()).cloned().unwrap_or_default();
        Ok(ids
            .iter()
            .filter_map(|id| policies.get(id).cloned())
            .collect())
    }

    async fn delete_policy(&self, policy_id: &str) -> StoreResult<()> {
        let mut policies = self.policies.write().await;
        if let Some(policy) = policies.remove(policy_id) {
            let mut index = self.guardian_index.write().await;
            if let Some(ids) = index.get_mut(policy.guardian_wallet_address.as_str()) {
                ids.retain(|id| id != policy_id);
            }
        }
        Ok(())
    }

    async fn put_link(&self, link: &WardLink) -> StoreResult<()> {
        let mut links = self.links.write().await;
        links.insert(link.ward_address.as_str().to_string(), link.clone());
        Ok(())
    }

    async fn get_link(&self, ward_address: &WalletAddress) -> StoreResult<Option<WardLink>> {
        let links = self.links.read().await;
        Ok(links.get(ward_address.as_str()).cloned())
    }

    async fn delete_link(&self, ward_address: &WalletAddress) -> StoreResult<()> {
        let mut links = self.links.write().await;
        links.remove(ward_address.as_str());
        Ok(())
    }

    async fn put_enforcement(
        &self,
        ward_address: &WalletAddress,
        record: EnforcementRecord,
    ) -> StoreResult<()> {
        let mut enforcement = self.enforcement.write().await;
        enforcement.insert(ward_address.as_str().to_string(), record);
        Ok(())
    }

    async fn get_enforcement(
        &self,
        ward_address: &WalletAddress,
    ) -> StoreResult<Option<EnforcementRecord>> {
        let enforcement = self.enforcement.read().await;
        Ok(enforcement.get(ward_address.as_str()).cloned())
    }

    async fn delete_enforcement(&self, ward_address: &WalletAddress) -> StoreResult<()> {
        let mut enforcement = self.enforcement.write().await;
        enforcement.remove(ward_address.as_str());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn sample_policy(id: &str, guardian: &str) -> GuardianPolicy {
        let now = Utc::now();
        GuardianPolicy {
            id: id.to_string(),
            name: "Allowance".to_string(),
            guardian_wallet_address: WalletAddress::parse(guardian).unwrap(),
            ward_wallet_address: None,
            usd_limit: Some(15.0),
            restrict_to_base: true,
            allowed_chains: Default::default(),
            allowed_addresses: None,
            blocked_actions: GuardianPolicy::default_blocked_actions(),
            is_active: true,
            compiled_document: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[tokio::test]
    async fn test_save_and_list_by_guardian() {
        let store = MemoryPolicyStore::new();
        let guardian = "0x1111111111111111111111111111111111111111";
        store
            .save_policy(&sample_policy("pol:1", guardian))
            .await
            .unwrap();
        store
            .save_policy(&sample_policy("pol:2", guardian))
            .await
            .unwrap();

        let listed = store
            .list_policies_by_guardian(&WalletAddress::parse(guardian).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.len(), 2);

        store.delete_policy("pol:1").await.unwrap();
        let listed = store
            .list_policies_by_guardian(&WalletAddress::parse(guardian).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "pol:2");
    }

    #[tokio::test]
    async fn test_resave_does_not_duplicate_index() {
        let store = MemoryPolicyStore::new();
        let guardian = "0x1111111111111111111111111111111111111111";
        let policy = sample_policy("pol:1", guardian);
        store.save_policy(&policy).await.unwrap();
        store.save_policy(&policy).await.unwrap();

        let listed = store
            .list_policies_by_guardian(&WalletAddress::parse(guardian).unwrap())
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
    }

    #[tokio::test]
    async fn test_link_lookup_is_case_folded() {
        let store = MemoryPolicyStore::new();
        let ward = WalletAddress::parse("0xABCDabcdABCDabcdABCDabcdABCDabcdABCDabcd").unwrap();
        store
            .put_link(&WardLink {
                ward_address: ward.clone(),
                policy_id: "pol:1".to_string(),
                guardian_wallet_address: WalletAddress::parse(
                    "0x1111111111111111111111111111111111111111",
                )
                .unwrap(),
            })
            .await
            .unwrap();

        // A differently-cased query address folds to the same key.
        let query =
            WalletAddress::parse("0xabcdABCDabcdABCDabcdABCDabcdABCDabcdABCD").unwrap();
        let link = store.get_link(&query).await.unwrap().unwrap();
        assert_eq!(link.policy_id, "pol:1");
    }
}
