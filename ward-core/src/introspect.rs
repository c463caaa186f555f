//! Policy introspection
//!
//! Display-time summaries of a compiled document. These are lossy
//! conveniences for UI: `usd_limit` takes the minimum across all
//! matching conditions, which can disagree with per-permission
//! evaluation when chains carry different limits.
//!
//! Summaries must never be used to make an enforcement decision; the
//! evaluator re-walks the document directly and does not call this
//! module.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::types::{
    ActionType, ChainId, Comparator, ConditionResource, Effect, PolicyDocument, Reference,
};

/// Chain ids appearing on any ALLOW permission
pub fn allowed_chains(doc: &PolicyDocument) -> BTreeSet<ChainId> {
    doc.permissions()
        .filter(|p| p.effect == Effect::Allow)
        .map(|p| p.chain_id.clone())
        .collect()
}

/// The tightest USD limit across all ALLOW/TRANSFER permissions
///
/// Scans VALUE conditions with LESS_THAN or EQUALS comparators and
/// returns the minimum reference found. Conservative for display; not
/// a decision input.
pub fn usd_limit(doc: &PolicyDocument) -> Option<f64> {
    doc.permissions()
        .filter(|p| p.effect == Effect::Allow && p.action == ActionType::Transfer)
        .flat_map(|p| p.conditions.iter())
        .filter(|c| {
            c.resource == ConditionResource::Value
                && matches!(c.comparator, Comparator::LessThan | Comparator::Equals)
        })
        .filter_map(|c| match c.reference {
            Reference::Number(n) => Some(n),
            _ => None,
        })
        .fold(None, |min, n| match min {
            Some(m) if m <= n => Some(m),
            _ => Some(n),
        })
}

/// The first ALLOW/TRANSFER permission's allowlist, if any
pub fn allowed_addresses(doc: &PolicyDocument) -> Option<Vec<String>> {
    doc.permissions()
        .filter(|p| p.effect == Effect::Allow && p.action == ActionType::Transfer)
        .flat_map(|p| p.conditions.iter())
        .find(|c| {
            c.resource == ConditionResource::ToAddress && c.comparator == Comparator::IncludedIn
        })
        .and_then(|c| match &c.reference {
            Reference::List(addresses) => Some(addresses.clone()),
            _ => None,
        })
}

/// Action types appearing on any DENY permission
pub fn denied_action_types(doc: &PolicyDocument) -> BTreeSet<ActionType> {
    doc.permissions()
        .filter(|p| p.effect == Effect::Deny)
        .map(|p| p.action)
        .collect()
}

/// Bundled summary for display surfaces
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicySummary {
    pub allowed_chains: BTreeSet<ChainId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usd_limit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub allowed_addresses: Option<Vec<String>>,
    pub denied_actions: BTreeSet<ActionType>,
}

/// Runs all four extractors over one document
pub fn summarize(doc: &PolicyDocument) -> PolicySummary {
    PolicySummary {
        allowed_chains: allowed_chains(doc),
        usd_limit: usd_limit(doc),
        allowed_addresses: allowed_addresses(doc),
        denied_actions: denied_action_types(doc),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compiler::{compile, CompileOptions};
    use crate::types::{Condition, Permission, Scope};

    #[test]
    fn test_summary_of_compiled_document() {
        let doc = compile(&CompileOptions {
            name: "Allowance".to_string(),
            usd_limit: Some(25.0),
            allowed_addresses: Some(vec![
                "0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()
            ]),
            restrict_to_base: true,
            ..Default::default()
        })
        .unwrap();

        let summary = summarize(&doc);
        assert_eq!(
            summary.allowed_chains,
            BTreeSet::from([ChainId::base()])
        );
        assert_eq!(summary.usd_limit, Some(25.0));
        assert_eq!(
            summary.allowed_addresses,
            Some(vec!["0xaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaaa".to_string()])
        );
        assert_eq!(
            summary.denied_actions,
            BTreeSet::from([ActionType::SmartContract, ActionType::DeployContract])
        );
    }

    #[test]
    fn test_usd_limit_takes_minimum() {
        let scope = Scope::new(
            "transfers",
            "",
            true,
            vec![
                Permission::allow(
                    ChainId::from("1"),
                    ActionType::Transfer,
                    vec![Condition::new(
                        ConditionResource::Value,
                        Comparator::LessThan,
                        Reference::Number(50.0),
                    )
                    .unwrap()],
                ),
                Permission::allow(
                    ChainId::from("8453"),
                    ActionType::Transfer,
                    vec![Condition::new(
                        ConditionResource::Value,
                        Comparator::LessThan,
                        Reference::Number(20.0),
                    )
                    .unwrap()],
                ),
            ],
        )
        .unwrap();
        let doc = PolicyDocument::new("ward", None, None, vec![scope]).unwrap();

        assert_eq!(usd_limit(&doc), Some(20.0));
    }

    #[test]
    fn test_usd_limit_none_without_value_conditions() {
        let doc = compile(&CompileOptions {
            name: "No limit".to_string(),
            restrict_to_base: true,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(usd_limit(&doc), None);
    }
}
