//! Policy Document schema
//!
//! The compiled, server-enforceable permission structure:
//! Policy → Scope → Permission → Condition.
//!
//! A document is immutable once compiled; configuration changes
//! produce a brand-new document. The JSON form is the wire format
//! consumed by the enforcement service and must round-trip exactly
//! (camelCase fields, SCREAMING_SNAKE_CASE enum values).

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{PolicyError, PolicyResult};
use crate::types::ChainId;

/// Permission effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    Allow,
    Deny,
}

/// Action type a permission governs
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    Transfer,
    SignMessage,
    SmartContract,
    DeployContract,
}

impl fmt::Display for ActionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Transfer => "TRANSFER",
            Self::SignMessage => "SIGN_MESSAGE",
            Self::SmartContract => "SMART_CONTRACT",
            Self::DeployContract => "DEPLOY_CONTRACT",
        };
        f.write_str(s)
    }
}

/// Condition comparator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Comparator {
    Equals,
    GreaterThan,
    LessThan,
    IncludedIn,
    NotIncludedIn,
}

impl fmt::Display for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Equals => "EQUALS",
            Self::GreaterThan => "GREATER_THAN",
            Self::LessThan => "LESS_THAN",
            Self::IncludedIn => "INCLUDED_IN",
            Self::NotIncludedIn => "NOT_INCLUDED_IN",
        };
        f.write_str(s)
    }
}

/// Condition type (only STATIC exists in the canonical schema)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConditionType {
    Static,
}

/// The transaction field a condition constrains
///
/// `Arguments(n)` addresses the n-th call argument and serializes as
/// `ARGUMENTS[n]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConditionResource {
    Value,
    ToAddress,
    FromAddress,
    Arguments(usize),
}

impl fmt::Display for ConditionResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value => f.write_str("VALUE"),
            Self::ToAddress => f.write_str("TO_ADDRESS"),
            Self::FromAddress => f.write_str("FROM_ADDRESS"),
            Self::Arguments(n) => write!(f, "ARGUMENTS[{n}]"),
        }
    }
}

impl FromStr for ConditionResource {
    type Err = PolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VALUE" => Ok(Self::Value),
            "TO_ADDRESS" => Ok(Self::ToAddress),
            "FROM_ADDRESS" => Ok(Self::FromAddress),
            _ => {
                let index = s
                    .strip_prefix("ARGUMENTS[")
                    .and_then(|rest| rest.strip_suffix(']'))
                    .and_then(|n| n.parse::<usize>().ok())
                    .ok_or_else(|| {
                        PolicyError::InvalidCondition(format!("unknown resource: {s}"))
                    })?;
                Ok(Self::Arguments(index))
            }
        }
    }
}

impl Serialize for ConditionResource {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for ConditionResource {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Condition reference value: number, string, or string list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Reference {
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl fmt::Display for Reference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
            Self::List(items) => write!(f, "[{}]", items.join(", ")),
        }
    }
}

/// A single constraint narrowing when a permission's effect applies
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    #[serde(rename = "type")]
    pub condition_type: ConditionType,
    pub resource: ConditionResource,
    pub comparator: Comparator,
    pub reference: Reference,
}

impl Condition {
    /// Builds a STATIC condition, rejecting reference/comparator
    /// mismatches (e.g. INCLUDED_IN requires a list)
    pub fn new(
        resource: ConditionResource,
        comparator: Comparator,
        reference: Reference,
    ) -> PolicyResult<Self> {
        let condition = Self {
            condition_type: ConditionType::Static,
            resource,
            comparator,
            reference,
        };
        condition.validate()?;
        Ok(condition)
    }

    /// Checks the reference type against the comparator semantics
    pub fn validate(&self) -> PolicyResult<()> {
        let compatible = match self.comparator {
            Comparator::IncludedIn | Comparator::NotIncludedIn => {
                matches!(self.reference, Reference::List(_))
            }
            Comparator::LessThan | Comparator::GreaterThan => {
                matches!(self.reference, Reference::Number(_))
            }
            Comparator::Equals => {
                matches!(self.reference, Reference::Number(_) | Reference::Text(_))
            }
        };
        if !compatible {
            return Err(PolicyError::InvalidCondition(format!(
                "comparator {} is incompatible with reference {}",
                self.comparator, self.reference
            )));
        }
        Ok(())
    }

    /// Short human-readable form, used in evaluation reasons
    pub fn describe(&self) -> String {
        format!("{} {} {}", self.resource, self.comparator, self.reference)
    }
}

/// One allow/deny rule for an (effect, chain, action-type) triple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Permission {
    pub effect: Effect,
    pub chain_id: ChainId,
    #[serde(rename = "type")]
    pub action: ActionType,
    #[serde(default)]
    pub conditions: Vec<Condition>,
}

impl Permission {
    /// ALLOW permission with the given conditions
    pub fn allow(chain_id: ChainId, action: ActionType, conditions: Vec<Condition>) -> Self {
        Self {
            effect: Effect::Allow,
            chain_id,
            action,
            conditions,
        }
    }

    /// DENY permission; DENY rules carry no conditions in the
    /// canonical schema (the evaluator ignores them regardless)
    pub fn deny(chain_id: ChainId, action: ActionType) -> Self {
        Self {
            effect: Effect::Deny,
            chain_id,
            action,
            conditions: Vec::new(),
        }
    }

    /// Whether this permission applies to the given (chain, action)
    pub fn matches(&self, chain_id: &ChainId, action: ActionType) -> bool {
        self.chain_id == *chain_id && self.action == action
    }
}

/// A user-consent grouping of related permissions
///
/// `required = true` marks non-negotiable security rules the guardian
/// cannot disable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scope {
    pub name: String,
    pub description: String,
    pub required: bool,
    pub permissions: Vec<Permission>,
}

impl Scope {
    /// Builds a scope, rejecting duplicate (chain, action, effect)
    /// permission tuples — two rules for the same action must be
    /// merged, not duplicated
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        required: bool,
        permissions: Vec<Permission>,
    ) -> PolicyResult<Self> {
        let scope = Self {
            name: name.into(),
            description: description.into(),
            required,
            permissions,
        };
        scope.validate()?;
        Ok(scope)
    }

    /// Checks for duplicate permission tuples and invalid conditions
    pub fn validate(&self) -> PolicyResult<()> {
        for (i, permission) in self.permissions.iter().enumerate() {
            for condition in &permission.conditions {
                condition.validate()?;
            }
            let duplicate = self.permissions[..i].iter().any(|other| {
                other.effect == permission.effect
                    && other.chain_id == permission.chain_id
                    && other.action == permission.action
            });
            if duplicate {
                return Err(PolicyError::DuplicatePermission {
                    chain_id: permission.chain_id.as_str().to_string(),
                    action: permission.action,
                    effect: permission.effect,
                });
            }
        }
        Ok(())
    }
}

/// Compiled permission document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PolicyDocument {
    pub partner_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_from: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub valid_to: Option<i64>,
    pub scopes: Vec<Scope>,
}

impl PolicyDocument {
    /// Builds a document, enforcing unique scope names
    pub fn new(
        partner_id: impl Into<String>,
        valid_from: Option<i64>,
        valid_to: Option<i64>,
        scopes: Vec<Scope>,
    ) -> PolicyResult<Self> {
        let doc = Self {
            partner_id: partner_id.into(),
            valid_from,
            valid_to,
            scopes,
        };
        doc.validate()?;
        Ok(doc)
    }

    /// Full structural validation: unique scope names, no duplicate
    /// permission tuples, reference types compatible with comparators.
    /// Used on documents arriving over the wire, where serde cannot
    /// enforce the constructors' checks.
    pub fn validate(&self) -> PolicyResult<()> {
        for (i, scope) in self.scopes.iter().enumerate() {
            scope.validate()?;
            if self.scopes[..i].iter().any(|other| other.name == scope.name) {
                return Err(PolicyError::DuplicateScope(scope.name.clone()));
            }
        }
        Ok(())
    }

    /// Iterates all permissions across all scopes
    pub fn permissions(&self) -> impl Iterator<Item = &Permission> {
        self.scopes.iter().flat_map(|scope| scope.permissions.iter())
    }
}
