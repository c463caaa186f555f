//! Protocol constants
//!
//! Centralized constants for Ward: chain identifiers, scope names and
//! default configuration values. Magic strings belong here, not inline.

/// Base mainnet chain id (decimal string form)
pub const BASE_CHAIN_ID: &str = "8453";

/// Default chain set applied when a policy neither restricts to Base
/// nor names an explicit chain set
pub const DEFAULT_CHAIN_IDS: &[&str] = &[
    "1",     // Ethereum mainnet
    "10",    // Optimism
    "137",   // Polygon
    "42161", // Arbitrum One
    "8453",  // Base
];

/// Scope carrying the per-chain transfer allowance permissions
pub const ALLOWANCE_SCOPE: &str = "allowance_transfer";

/// Required security scope blocking contract deployment
pub const NO_DEPLOY_SCOPE: &str = "security_no_deploy";

/// Required security scope blocking smart contract calls
pub const NO_CONTRACT_CALLS_SCOPE: &str = "security_no_contract_calls";

/// Partner id attached to compiled documents when none is configured
pub const DEFAULT_PARTNER_ID: &str = "ward";
