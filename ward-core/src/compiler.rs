//! Policy compiler
//!
//! Turns a guardian's configuration (spend cap, allowlist, chain
//! restriction) into a compiled Policy Document. The function is pure
//! and deterministic: identical options compile to identical documents
//! (no hidden timestamps), so recompilation is idempotent.

use std::collections::BTreeSet;

use crate::constants::{
    ALLOWANCE_SCOPE, DEFAULT_CHAIN_IDS, DEFAULT_PARTNER_ID, NO_CONTRACT_CALLS_SCOPE,
    NO_DEPLOY_SCOPE,
};
use crate::error::{PolicyError, PolicyResult};
use crate::types::{
    ActionType, ChainId, Comparator, Condition, ConditionResource, Permission, PolicyDocument,
    Reference, Scope, WalletAddress,
};

/// Guardian configuration fed to the compiler
#[derive(Debug, Clone, Default)]
pub struct CompileOptions {
    /// Policy display name (used in scope descriptions)
    pub name: String,
    /// USD spend cap; must be strictly positive when present
    pub usd_limit: Option<f64>,
    /// Recipient allowlist; addresses are format-checked and
    /// lowercased here
    pub allowed_addresses: Option<Vec<String>>,
    /// Restrict all activity to Base
    pub restrict_to_base: bool,
    /// Explicit chain set (ignored when `restrict_to_base`)
    pub allowed_chains: Option<BTreeSet<ChainId>>,
    /// Partner id stamped on the document
    pub partner_id: Option<String>,
    /// Optional validity window (unix seconds)
    pub valid_from: Option<i64>,
    pub valid_to: Option<i64>,
}

/// Compiles guardian configuration into a Policy Document
///
/// Fails with `InvalidPolicyOptions` when the spend cap is not
/// strictly positive or an allowlist address is malformed. Callers
/// holding a previously compiled document must keep it on failure.
pub fn compile(options: &CompileOptions) -> PolicyResult<PolicyDocument> {
    let usd_limit = validate_usd_limit(options.usd_limit)?;
    let allowlist = validate_allowlist(options.allowed_addresses.as_deref())?;
    let chains = resolve_chains(options);

    // All per-transfer constraints are ANDed on one ALLOW permission
    // per chain.
    let mut conditions = Vec::new();
    if let Some(limit) = usd_limit {
        conditions.push(Condition::new(
            ConditionResource::Value,
            Comparator::LessThan,
            Reference::Number(limit),
        )?);
    }
    if let Some(addresses) = &allowlist {
        conditions.push(Condition::new(
            ConditionResource::ToAddress,
            Comparator::IncludedIn,
            Reference::List(addresses.clone()),
        )?);
    }

    let transfers = chains
        .iter()
        .map(|chain| Permission::allow(chain.clone(), ActionType::Transfer, conditions.clone()))
        .collect();

    let no_deploys = chains
        .iter()
        .map(|chain| Permission::deny(chain.clone(), ActionType::DeployContract))
        .collect();

    let no_contract_calls = chains
        .iter()
        .map(|chain| Permission::deny(chain.clone(), ActionType::SmartContract))
        .collect();

    let scopes = vec![
        Scope::new(
            ALLOWANCE_SCOPE,
            format!("Transfer allowance for {}", options.name),
            true,
            transfers,
        )?,
        Scope::new(
            NO_DEPLOY_SCOPE,
            "Contract deployment is blocked",
            true,
            no_deploys,
        )?,
        Scope::new(
            NO_CONTRACT_CALLS_SCOPE,
            "Smart contract calls are blocked",
            true,
            no_contract_calls,
        )?,
    ];

    let partner_id = options
        .partner_id
        .clone()
        .unwrap_or_else(|| DEFAULT_PARTNER_ID.to_string());

    PolicyDocument::new(partner_id, options.valid_from, options.valid_to, scopes)
}

/// Effective chain set: Base only, the explicit set, or the default
/// full set
fn resolve_chains(options: &CompileOptions) -> Vec<ChainId> {
    if options.restrict_to_base {
        return vec![ChainId::base()];
    }
    match &options.allowed_chains {
        Some(chains) if !chains.is_empty() => chains.iter().cloned().collect(),
        _ => DEFAULT_CHAIN_IDS.iter().map(|id| ChainId::from(*id)).collect(),
    }
}

fn validate_usd_limit(limit: Option<f64>) -> PolicyResult<Option<f64>> {
    match limit {
        None => Ok(None),
        Some(value) if value.is_finite() && value > 0.0 => Ok(Some(value)),
        Some(value) => Err(PolicyError::InvalidPolicyOptions(format!(
            "usd_limit must be strictly positive, got {value}"
        ))),
    }
}

/// Format-checks and lowercases the allowlist; an empty list compiles
/// as if absent
fn validate_allowlist(addresses: Option<&[String]>) -> PolicyResult<Option<Vec<String>>> {
    let Some(addresses) = addresses else {
        return Ok(None);
    };
    if addresses.is_empty() {
        return Ok(None);
    }
    let mut folded = BTreeSet::new();
    for raw in addresses {
        let address = WalletAddress::parse(raw)
            .map_err(|e| PolicyError::InvalidPolicyOptions(e.to_string()))?;
        folded.insert(address.as_str().to_string());
    }
    Ok(Some(folded.into_iter().collect()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::BASE_CHAIN_ID;
    use crate::types::Effect;

    fn base_options() -> CompileOptions {
        CompileOptions {
            name: "Weekly allowance".to_string(),
            usd_limit: Some(15.0),
            restrict_to_base: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_scenario_a_base_restricted_with_limit() {
        let doc = compile(&base_options()).unwrap();

        let transfers: Vec<_> = doc
            .permissions()
            .filter(|p| p.effect == Effect::Allow && p.action == ActionType::Transfer)
            .collect();
        assert_eq!(transfers.len(), 1);
        assert_eq!(transfers[0].chain_id.as_str(), BASE_CHAIN_ID);
        assert_eq!(transfers[0].conditions.len(), 1);
        assert_eq!(transfers[0].conditions[0].comparator, Comparator::LessThan);
        assert_eq!(
            transfers[0].conditions[0].reference,
            Reference::Number(15.0)
        );

        let denied: Vec<_> = doc
            .permissions()
            .filter(|p| p.effect == Effect::Deny)
            .map(|p| (p.chain_id.as_str(), p.action))
            .collect();
        assert!(denied.contains(&(BASE_CHAIN_ID, ActionType::DeployContract)));
        assert!(denied.contains(&(BASE_CHAIN_ID, ActionType::SmartContract)));

        // Security scopes are required and unconditional.
        for scope in &doc.scopes {
            assert!(scope.required);
        }
        for permission in doc.permissions().filter(|p| p.effect == Effect::Deny) {
            assert!(permission.conditions.is_empty());
        }
    }

    #[test]
    fn test_compile_is_idempotent() {
        let options = CompileOptions {
            allowed_addresses: Some(vec![
                "0xAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaa".to_string(),
                "0xBBBBbbbbBBBBbbbbBBBBbbbbBBBBbbbbBBBBbbbb".to_string(),
            ]),
            ..base_options()
        };
        let first = serde_json::to_string(&compile(&options).unwrap()).unwrap();
        let second = serde_json::to_string(&compile(&options).unwrap()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_allowlist_is_lowercased() {
        let options = CompileOptions {
            allowed_addresses: Some(vec![
                "0xAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaa".to_string()
            ]),
            ..base_options()
        };
        let doc = compile(&options).unwrap();
        let transfer = doc
            .permissions()
            .find(|p| p.action == ActionType::Transfer)
            .unwrap();
        let allowlist = transfer
            .conditions
            .iter()
            .find(|c| c.resource == ConditionResource::ToAddress)
            .unwrap();
        assert_eq!(
            allowlist.reference,
            Reference::List(vec![
                "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()
            ])
        );
    }

    #[test]
    fn test_default_chain_set_when_unrestricted() {
        let options = CompileOptions {
            restrict_to_base: false,
            ..base_options()
        };
        let doc = compile(&options).unwrap();
        let chains: Vec<_> = doc
            .permissions()
            .filter(|p| p.action == ActionType::Transfer)
            .map(|p| p.chain_id.as_str())
            .collect();
        assert_eq!(chains, DEFAULT_CHAIN_IDS.to_vec());
    }

    #[test]
    fn test_explicit_chain_set() {
        let options = CompileOptions {
            restrict_to_base: false,
            allowed_chains: Some(BTreeSet::from([ChainId::from("1"), ChainId::from("8453")])),
            ..base_options()
        };
        let doc = compile(&options).unwrap();
        let chains: BTreeSet<_> = doc
            .permissions()
            .map(|p| p.chain_id.as_str().to_string())
            .collect();
        assert_eq!(chains, BTreeSet::from(["1".to_string(), "8453".to_string()]));
    }

    #[test]
    fn test_rejects_non_positive_limit() {
        for bad in [0.0, -5.0, f64::NAN, f64::INFINITY] {
            let options = CompileOptions {
                usd_limit: Some(bad),
                ..base_options()
            };
            assert!(matches!(
                compile(&options),
                Err(PolicyError::InvalidPolicyOptions(_))
            ));
        }
    }

    #[test]
    fn test_rejects_malformed_allowlist_address() {
        let options = CompileOptions {
            allowed_addresses: Some(vec!["not-an-address".to_string()]),
            ..base_options()
        };
        assert!(matches!(
            compile(&options),
            Err(PolicyError::InvalidPolicyOptions(_))
        ));
    }

    #[test]
    fn test_no_conditions_without_limit_or_allowlist() {
        let options = CompileOptions {
            usd_limit: None,
            allowed_addresses: Some(Vec::new()),
            ..base_options()
        };
        let doc = compile(&options).unwrap();
        let transfer = doc
            .permissions()
            .find(|p| p.action == ActionType::Transfer)
            .unwrap();
        assert!(transfer.conditions.is_empty());
    }
}
