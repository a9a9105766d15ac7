use serde::{Deserialize, Serialize};

use crate::status::DecisionPolicy;

/// Ledger-level behavior switches shared by the registry and the node.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Reject issuance unless an issuer↔holder relationship exists.
    #[serde(default)]
    pub require_relationship: bool,
    /// Make accept/deny one-way: a decided credential cannot be re-flipped.
    #[serde(default)]
    pub terminal_decisions: bool,
}

impl LedgerConfig {
    pub fn decision_policy(&self) -> DecisionPolicy {
        if self.terminal_decisions {
            DecisionPolicy::Terminal
        } else {
            DecisionPolicy::Reversible
        }
    }
}
