//! Guardian policy lifecycle service
//!
//! Owns the `GuardianPolicy` aggregate: creation compiles the
//! document, every edit recompiles and replaces it atomically, and a
//! failed recompilation leaves the stored aggregate untouched. Also
//! hosts the authoritative enforcement path: store lookup followed by
//! the shared evaluator, failing closed when no policy is on file.

use chrono::Utc;
use std::collections::BTreeSet;
use std::sync::Arc;
use uuid::Uuid;

use ward_core::{
    compile, evaluate, introspect, ChainId, CompileOptions, Evaluation, GuardianPolicy,
    PolicySummary, TransactionRequest, WalletAddress, WardLink,
};

use crate::error::{StoreError, StoreResult};
use crate::store::{EnforcementRecord, PolicyStore};

/// Input for creating a policy
#[derive(Debug, Clone)]
pub struct NewPolicy {
    pub name: String,
    pub guardian_wallet_address: String,
    pub usd_limit: Option<f64>,
    pub restrict_to_base: bool,
    pub allowed_chains: Option<Vec<String>>,
    pub allowed_addresses: Option<Vec<String>>,
}

/// Partial update to a policy's configuration
///
/// `clear_*` flags distinguish "remove the value" from "leave it
/// alone".
#[derive(Debug, Clone, Default)]
pub struct PolicyChanges {
    pub name: Option<String>,
    pub usd_limit: Option<f64>,
    pub clear_usd_limit: bool,
    pub restrict_to_base: Option<bool>,
    pub allowed_chains: Option<Vec<String>>,
    pub allowed_addresses: Option<Vec<String>>,
    pub clear_allowed_addresses: bool,
    pub is_active: Option<bool>,
}

/// Service over a `PolicyStore` managing policy lifecycle and the
/// authoritative evaluation path
pub struct PolicyService {
    store: Arc<dyn PolicyStore>,
    partner_id: String,
}

impl PolicyService {
    /// Creates a service with the partner id stamped on compiled
    /// documents
    pub fn new(store: Arc<dyn PolicyStore>, partner_id: impl Into<String>) -> Self {
        Self {
            store,
            partner_id: partner_id.into(),
        }
    }

    /// Validates, compiles and stores a new guardian policy
    pub async fn create_policy(&self, input: NewPolicy) -> StoreResult<GuardianPolicy> {
        let guardian = WalletAddress::parse(&input.guardian_wallet_address)?;
        let allowed_chains = parse_chains(input.allowed_chains.as_deref());
        let allowed_addresses = parse_allowlist(input.allowed_addresses.as_deref())?;

        let options = CompileOptions {
            name: input.name.clone(),
            usd_limit: input.usd_limit,
            allowed_addresses: input.allowed_addresses.clone(),
            restrict_to_base: input.restrict_to_base,
            allowed_chains: Some(allowed_chains.clone()).filter(|c| !c.is_empty()),
            partner_id: Some(self.partner_id.clone()),
            valid_from: None,
            valid_to: None,
        };
        let document = compile(&options)?;

        let now = Utc::now();
        let policy = GuardianPolicy {
            id: format!("pol:{}", Uuid::new_v4()),
            name: input.name,
            guardian_wallet_address: guardian,
            ward_wallet_address: None,
            usd_limit: input.usd_limit,
            restrict_to_base: input.restrict_to_base,
            allowed_chains,
            allowed_addresses,
            blocked_actions: GuardianPolicy::default_blocked_actions(),
            is_active: true,
            compiled_document: Some(document),
            created_at: now,
            updated_at: now,
        };
        self.store.save_policy(&policy).await?;

        tracing::info!(
            policy_id = %policy.id,
            guardian = %policy.guardian_wallet_address,
            "Guardian policy created"
        );
        Ok(policy)
    }

    /// Fetch a policy by id
    pub async fn get_policy(&self, policy_id: &str) -> StoreResult<GuardianPolicy> {
        self.store
            .get_policy(policy_id)
            .await?
            .ok_or_else(|| StoreError::PolicyNotFound(policy_id.to_string()))
    }

    /// List policies owned by a guardian address
    pub async fn list_policies(&self, guardian: &str) -> StoreResult<Vec<GuardianPolicy>> {
        let guardian = WalletAddress::parse(guardian)?;
        self.store.list_policies_by_guardian(&guardian).await
    }

    /// Applies configuration changes, recompiling the document
    ///
    /// The new document is compiled before anything is written; on
    /// compile failure the stored aggregate, including its previous
    /// compiled document, is left untouched.
    pub async fn update_policy(
        &self,
        policy_id: &str,
        changes: PolicyChanges,
    ) -> StoreResult<GuardianPolicy> {
        let mut policy = self.get_policy(policy_id).await?;

        if let Some(name) = changes.name {
            policy.name = name;
        }
        if changes.clear_usd_limit {
            policy.usd_limit = None;
        } else if let Some(limit) = changes.usd_limit {
            policy.usd_limit = Some(limit);
        }
        if let Some(restrict) = changes.restrict_to_base {
            policy.restrict_to_base = restrict;
        }
        if let Some(chains) = changes.allowed_chains {
            policy.allowed_chains = parse_chains(Some(chains.as_slice()));
        }
        if changes.clear_allowed_addresses {
            policy.allowed_addresses = None;
        } else if let Some(addresses) = changes.allowed_addresses {
            policy.allowed_addresses = parse_allowlist(Some(addresses.as_slice()))?;
        }
        if let Some(active) = changes.is_active {
            policy.is_active = active;
        }

        // Compile first; only a successful compilation may replace the
        // stored document.
        let document = compile(&self.options_for(&policy))?;
        policy.compiled_document = Some(document.clone());
        policy.updated_at = Utc::now();
        self.store.save_policy(&policy).await?;

        if let Some(ward) = &policy.ward_wallet_address {
            self.store
                .put_enforcement(
                    ward,
                    EnforcementRecord {
                        guardian_wallet_address: policy.guardian_wallet_address.clone(),
                        policy: document,
                        is_active: policy.is_active,
                    },
                )
                .await?;
        }

        tracing::info!(policy_id = %policy.id, "Guardian policy updated and recompiled");
        Ok(policy)
    }

    /// Links a ward wallet to a policy and publishes the enforcement
    /// record under the lowercased ward address
    pub async fn link_ward_wallet(
        &self,
        policy_id: &str,
        ward_address: &str,
    ) -> StoreResult<GuardianPolicy> {
        let ward = WalletAddress::parse(ward_address)?;

        if let Some(existing) = self.store.get_link(&ward).await? {
            if existing.policy_id != policy_id {
                return Err(StoreError::AlreadyExists(format!(
                    "ward {ward} is already governed by {}",
                    existing.policy_id
                )));
            }
        }

        let mut policy = self.get_policy(policy_id).await?;
        let document = policy
            .compiled_document
            .clone()
            .ok_or_else(|| StoreError::Storage("policy has no compiled document".to_string()))?;

        // A policy governs at most one ward. Relinking retires the
        // previous ward's link and enforcement record; leaving them
        // behind would keep enforcing a policy the guardian moved away.
        if let Some(previous) = policy.ward_wallet_address.take() {
            if previous != ward {
                self.store.delete_link(&previous).await?;
                self.store.delete_enforcement(&previous).await?;
                tracing::info!(
                    policy_id = %policy.id,
                    ward = %previous,
                    "Previous ward wallet unlinked"
                );
            }
        }

        policy.ward_wallet_address = Some(ward.clone());
        policy.updated_at = Utc::now();
        self.store.save_policy(&policy).await?;

        self.store
            .put_link(&WardLink {
                ward_address: ward.clone(),
                policy_id: policy.id.clone(),
                guardian_wallet_address: policy.guardian_wallet_address.clone(),
            })
            .await?;
        self.store
            .put_enforcement(
                &ward,
                EnforcementRecord {
                    guardian_wallet_address: policy.guardian_wallet_address.clone(),
                    policy: document,
                    is_active: policy.is_active,
                },
            )
            .await?;

        tracing::info!(policy_id = %policy.id, ward = %ward, "Ward wallet linked");
        Ok(policy)
    }

    /// Removes a policy together with its link and enforcement record
    pub async fn delete_policy(&self, policy_id: &str) -> StoreResult<()> {
        let policy = self.get_policy(policy_id).await?;
        if let Some(ward) = &policy.ward_wallet_address {
            self.store.delete_link(ward).await?;
            self.store.delete_enforcement(ward).await?;
        }
        self.store.delete_policy(policy_id).await?;

        tracing::info!(policy_id = %policy_id, "Guardian policy deleted");
        Ok(())
    }

    /// Display summary of a policy's compiled document
    pub async fn summarize_policy(&self, policy_id: &str) -> StoreResult<PolicySummary> {
        let policy = self.get_policy(policy_id).await?;
        let document = policy
            .compiled_document
            .as_ref()
            .ok_or_else(|| StoreError::Storage("policy has no compiled document".to_string()))?;
        Ok(introspect::summarize(document))
    }

    /// Authoritative enforcement-time decision for a ward wallet
    ///
    /// Looks up the stored document rather than trusting any
    /// client-supplied one. A missing policy is a hard denial, never
    /// "no restrictions".
    pub async fn authorize_transaction(
        &self,
        ward_address: &str,
        tx: &TransactionRequest,
    ) -> StoreResult<Evaluation> {
        tx.validate()?;
        let ward = WalletAddress::parse(ward_address)?;

        let Some(record) = self.store.get_enforcement(&ward).await? else {
            tracing::warn!(ward = %ward, "Authorization requested with no policy on file");
            return Ok(Evaluation::deny(format!("no policy on file for ward {ward}")));
        };

        if !record.is_active {
            tracing::warn!(ward = %ward, "Authorization requested against an inactive policy");
            return Ok(Evaluation::deny(format!(
                "policy governing ward {ward} is inactive"
            )));
        }

        let evaluation = evaluate(&record.policy, tx);
        tracing::info!(
            ward = %ward,
            chain_id = %tx.chain_id,
            action = %tx.action,
            allowed = evaluation.allowed,
            reason = evaluation.reason.as_deref().unwrap_or(""),
            "Transaction evaluated"
        );
        Ok(evaluation)
    }

    fn options_for(&self, policy: &GuardianPolicy) -> CompileOptions {
        CompileOptions {
            name: policy.name.clone(),
            usd_limit: policy.usd_limit,
            allowed_addresses: policy
                .allowed_addresses
                .as_ref()
                .map(|set| set.iter().map(|a| a.as_str().to_string()).collect()),
            restrict_to_base: policy.restrict_to_base,
            allowed_chains: Some(policy.allowed_chains.clone())
                .filter(|chains| !chains.is_empty()),
            partner_id: Some(self.partner_id.clone()),
            valid_from: None,
            valid_to: None,
        }
    }
}

fn parse_chains(chains: Option<&[String]>) -> BTreeSet<ChainId> {
    chains
        .map(|chains| chains.iter().map(|c| ChainId::new(c.clone())).collect())
        .unwrap_or_default()
}

fn parse_allowlist(
    addresses: Option<&[String]>,
) -> StoreResult<Option<BTreeSet<WalletAddress>>> {
    let Some(addresses) = addresses else {
        return Ok(None);
    };
    let mut parsed = BTreeSet::new();
    for raw in addresses {
        parsed.insert(WalletAddress::parse(raw)?);
    }
    Ok(Some(parsed))
}
