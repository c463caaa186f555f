//! Transaction evaluator
//!
//! Pure decision function for one candidate transaction against one
//! Policy Document. This is the single shared implementation: the
//! advisory pre-flight check and the authoritative store-backed check
//! both call it, so the two can never drift.
//!
//! Precedence (ordered, first match wins):
//! 1. Any DENY permission matching (chain, action) denies immediately,
//!    regardless of matching ALLOW permissions. Fail closed.
//! 2. A matching ALLOW permission has its conditions evaluated as a
//!    conjunction; a condition whose required input is absent is
//!    skipped, not failed.
//! 3. No matching permission denies, distinguishing "chain not
//!    allowed" from "no permission for this action type".

use serde::{Deserialize, Serialize};

use crate::error::{PolicyError, PolicyResult};
use crate::types::{
    ActionType, ChainId, Comparator, Condition, ConditionResource, Effect, PolicyDocument,
    Reference,
};

/// Candidate transaction submitted for evaluation
///
/// `value_usd` comes from an external price oracle. Conditions over
/// absent inputs are skipped, so callers must supply `value_usd` and
/// `to` whenever available.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRequest {
    pub chain_id: ChainId,
    #[serde(rename = "type")]
    pub action: ActionType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<f64>,
}

impl TransactionRequest {
    /// Rejects structurally unusable requests before evaluation
    pub fn validate(&self) -> PolicyResult<()> {
        if self.chain_id.as_str().is_empty() {
            return Err(PolicyError::MalformedTransaction(
                "chainId must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Evaluation outcome: a value, never an error
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Evaluation {
    pub allowed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_condition: Option<String>,
}

impl Evaluation {
    /// Allowed outcome
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
            matched_condition: None,
        }
    }

    /// Denied outcome with a caller-visible reason
    pub fn deny(reason: impl Into<String>) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            matched_condition: None,
        }
    }

    /// Denied outcome citing the failing condition
    pub fn deny_condition(reason: impl Into<String>, condition: &Condition) -> Self {
        Self {
            allowed: false,
            reason: Some(reason.into()),
            matched_condition: Some(condition.describe()),
        }
    }
}

/// Decides ALLOW/DENY for a candidate transaction against a document
pub fn evaluate(doc: &PolicyDocument, tx: &TransactionRequest) -> Evaluation {
    // 1. DENY precedence: DENY always wins over ALLOW for the same
    // (chain, action) pair. Conditions on DENY rules are ignored.
    if doc
        .permissions()
        .any(|p| p.effect == Effect::Deny && p.matches(&tx.chain_id, tx.action))
    {
        return Evaluation::deny(format!(
            "action {} is blocked on chain {}",
            tx.action, tx.chain_id
        ));
    }

    // 2. ALLOW matching.
    let matched = doc
        .permissions()
        .find(|p| p.effect == Effect::Allow && p.matches(&tx.chain_id, tx.action));

    let Some(permission) = matched else {
        // 3. No matching permission: distinguish the two sub-reasons
        // for caller diagnostics.
        let chain_known = doc
            .permissions()
            .any(|p| p.effect == Effect::Allow && p.chain_id == tx.chain_id);
        return if chain_known {
            Evaluation::deny(format!(
                "no permission for action {} on chain {}",
                tx.action, tx.chain_id
            ))
        } else {
            Evaluation::deny(format!("chain {} not allowed", tx.chain_id))
        };
    };

    // 4. Condition conjunction: all must pass; absent inputs skip.
    for condition in &permission.conditions {
        if let Some(denial) = check_condition(condition, tx) {
            return denial;
        }
    }
    Evaluation::allow()
}

/// Evaluates one condition; `None` means pass or not-evaluated
fn check_condition(condition: &Condition, tx: &TransactionRequest) -> Option<Evaluation> {
    match (&condition.resource, condition.comparator, &condition.reference) {
        (ConditionResource::Value, Comparator::LessThan, Reference::Number(limit)) => {
            let value = tx.value_usd?;
            // The limit is exclusive: at-or-above is rejected.
            if value >= *limit {
                return Some(Evaluation::deny_condition(
                    format!("transaction value ${value} is not below the ${limit} limit"),
                    condition,
                ));
            }
            None
        }
        (ConditionResource::Value, Comparator::GreaterThan, Reference::Number(floor)) => {
            let value = tx.value_usd?;
            if value <= *floor {
                return Some(Evaluation::deny_condition(
                    format!("transaction value ${value} is not above ${floor}"),
                    condition,
                ));
            }
            None
        }
        (ConditionResource::Value, Comparator::Equals, Reference::Number(expected)) => {
            let value = tx.value_usd?;
            if value != *expected {
                return Some(Evaluation::deny_condition(
                    format!("transaction value ${value} is not exactly ${expected}"),
                    condition,
                ));
            }
            None
        }
        (ConditionResource::ToAddress, Comparator::IncludedIn, Reference::List(allowed)) => {
            let to = tx.to.as_deref()?;
            let listed = allowed.iter().any(|a| a.eq_ignore_ascii_case(to));
            if !listed {
                return Some(Evaluation::deny_condition(
                    format!("recipient {to} is not on the allowlist"),
                    condition,
                ));
            }
            None
        }
        (ConditionResource::ToAddress, Comparator::NotIncludedIn, Reference::List(blocked)) => {
            let to = tx.to.as_deref()?;
            let listed = blocked.iter().any(|a| a.eq_ignore_ascii_case(to));
            if listed {
                return Some(Evaluation::deny_condition(
                    format!("recipient {to} is on the blocklist"),
                    condition,
                ));
            }
            None
        }
        // FROM_ADDRESS and ARGUMENTS[n] resources have no input on a
        // TransactionRequest; absence of data is not proof of
        // violation, so they are not evaluated.
        _ => None,
    }
}

/// Classifies a raw transaction shape into an action type
///
/// Precedence: no recipient → contract deployment; non-empty calldata
/// → smart contract call; otherwise a plain transfer.
pub fn classify_action(to: Option<&str>, data: Option<&str>) -> ActionType {
    if to.is_none() {
        return ActionType::DeployContract;
    }
    match data {
        Some(data) if !data.is_empty() && data != "0x" => ActionType::SmartContract,
        _ => ActionType::Transfer,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile, CompileOptions};

    fn allowance_doc() -> PolicyDocument {
        compile(&CompileOptions {
            name: "Weekly allowance".to_string(),
            usd_limit: Some(15.0),
            restrict_to_base: true,
            ..Default::default()
        })
        .unwrap()
    }

    fn transfer(value_usd: f64) -> TransactionRequest {
        TransactionRequest {
            chain_id: ChainId::base(),
            action: ActionType::Transfer,
            to: Some("0xcccccccccccccccccccccccccccccccccccccccc".to_string()),
            value_usd: Some(value_usd),
        }
    }

    #[test]
    fn test_scenario_b_at_limit_is_denied() {
        let result = evaluate(&allowance_doc(), &transfer(15.0));
        assert!(!result.allowed);
        assert!(result.reason.unwrap().contains("$15"));
    }

    #[test]
    fn test_scenario_c_below_limit_is_allowed() {
        let result = evaluate(&allowance_doc(), &transfer(14.99));
        assert!(result.allowed);
        assert!(result.reason.is_none());
    }

    #[test]
    fn test_scenario_d_deploy_is_denied() {
        let tx = TransactionRequest {
            chain_id: ChainId::base(),
            action: ActionType::DeployContract,
            to: None,
            value_usd: Some(0.01),
        };
        let result = evaluate(&allowance_doc(), &tx);
        assert!(!result.allowed);
        assert!(result.reason.unwrap().contains("DEPLOY_CONTRACT"));
    }

    #[test]
    fn test_scenario_e_allowlist_is_case_insensitive() {
        let doc = compile(&CompileOptions {
            name: "Allowlist".to_string(),
            allowed_addresses: Some(vec![
                "0xAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaaAAAAaaaa".to_string()
            ]),
            restrict_to_base: true,
            ..Default::default()
        })
        .unwrap();

        let tx = TransactionRequest {
            to: Some("0xAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA".to_string()),
            value_usd: None,
            ..transfer(0.0)
        };
        assert!(evaluate(&doc, &tx).allowed);

        let stranger = TransactionRequest {
            to: Some("0xbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbbb".to_string()),
            value_usd: None,
            ..transfer(0.0)
        };
        let result = evaluate(&doc, &stranger);
        assert!(!result.allowed);
        assert!(result.matched_condition.unwrap().contains("INCLUDED_IN"));
    }

    #[test]
    fn test_deny_wins_over_allow() {
        // Hand-build a document where the same (chain, action) pair is
        // both allowed (unconditionally) and denied.
        let doc = PolicyDocument::new(
            "ward",
            None,
            None,
            vec![
                crate::types::Scope::new(
                    "grants",
                    "",
                    false,
                    vec![crate::types::Permission::allow(
                        ChainId::base(),
                        ActionType::SignMessage,
                        Vec::new(),
                    )],
                )
                .unwrap(),
                crate::types::Scope::new(
                    "blocks",
                    "",
                    true,
                    vec![crate::types::Permission::deny(
                        ChainId::base(),
                        ActionType::SignMessage,
                    )],
                )
                .unwrap(),
            ],
        )
        .unwrap();

        let tx = TransactionRequest {
            chain_id: ChainId::base(),
            action: ActionType::SignMessage,
            to: None,
            value_usd: None,
        };
        assert!(!evaluate(&doc, &tx).allowed);
    }

    #[test]
    fn test_unknown_chain_vs_unknown_action_reasons() {
        let doc = allowance_doc();

        let wrong_chain = TransactionRequest {
            chain_id: ChainId::from("1"),
            ..transfer(1.0)
        };
        let result = evaluate(&doc, &wrong_chain);
        assert!(!result.allowed);
        assert!(result.reason.unwrap().contains("chain 1 not allowed"));

        let wrong_action = TransactionRequest {
            action: ActionType::SignMessage,
            ..transfer(1.0)
        };
        let result = evaluate(&doc, &wrong_action);
        assert!(!result.allowed);
        assert!(result
            .reason
            .unwrap()
            .contains("no permission for action SIGN_MESSAGE"));
    }

    #[test]
    fn test_absent_value_skips_limit_condition() {
        let tx = TransactionRequest {
            value_usd: None,
            ..transfer(0.0)
        };
        assert!(evaluate(&allowance_doc(), &tx).allowed);
    }

    #[test]
    fn test_classify_action() {
        assert_eq!(classify_action(None, None), ActionType::DeployContract);
        assert_eq!(
            classify_action(Some("0xabc"), Some("0xdeadbeef")),
            ActionType::SmartContract
        );
        assert_eq!(classify_action(Some("0xabc"), Some("0x")), ActionType::Transfer);
        assert_eq!(classify_action(Some("0xabc"), None), ActionType::Transfer);
    }

    #[test]
    fn test_document_round_trip() {
        let doc = allowance_doc();
        let json = serde_json::to_string(&doc).unwrap();
        let parsed: PolicyDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, doc);
    }
}
