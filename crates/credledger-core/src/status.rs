use std::fmt;

use crate::error::CoreError;

/// Acceptance status of a credential, derived from its `accepted`/`denied` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum AcceptanceStatus {
    /// Issued but not yet acted on by the holder. Both flags false.
    Pending,
    /// Holder accepted the credential.
    Accepted,
    /// Holder denied the credential.
    Denied,
}

impl AcceptanceStatus {
    /// Derive the status from the two persisted flags.
    ///
    /// The flags are mutually exclusive; a record carrying both is treated as denied.
    pub fn from_flags(accepted: bool, denied: bool) -> Self {
        match (accepted, denied) {
            (false, false) => Self::Pending,
            (true, false) => Self::Accepted,
            (_, true) => Self::Denied,
        }
    }

    /// The `(accepted, denied)` flag pair for this status.
    pub fn flags(&self) -> (bool, bool) {
        match self {
            Self::Pending => (false, false),
            Self::Accepted => (true, false),
            Self::Denied => (false, true),
        }
    }

    /// Whether the holder has already decided.
    pub fn is_decided(&self) -> bool {
        !matches!(self, Self::Pending)
    }
}

impl fmt::Display for AcceptanceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Denied => "Denied",
        })
    }
}

/// Holder decisions that drive status transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecisionEvent {
    /// Holder accepts the credential.
    Accept,
    /// Holder denies the credential.
    Deny,
}

impl DecisionEvent {
    fn target(&self) -> AcceptanceStatus {
        match self {
            Self::Accept => AcceptanceStatus::Accepted,
            Self::Deny => AcceptanceStatus::Denied,
        }
    }
}

/// Whether a decision, once made, can be changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecisionPolicy {
    /// Accept and deny are available from every state; last write wins.
    #[default]
    Reversible,
    /// Only `Pending` may transition; `Accepted` and `Denied` are final.
    Terminal,
}

/// Applies holder decisions to the acceptance status.
///
/// Under [`DecisionPolicy::Reversible`]:
/// - any → Accepted (Accept)
/// - any → Denied (Deny)
///
/// Under [`DecisionPolicy::Terminal`]:
/// - Pending → Accepted (Accept)
/// - Pending → Denied (Deny)
pub struct StatusMachine;

impl StatusMachine {
    /// Attempt a transition. Returns the new status or an error when the
    /// policy forbids leaving the current status.
    pub fn transition(
        current: AcceptanceStatus,
        event: DecisionEvent,
        policy: DecisionPolicy,
    ) -> Result<AcceptanceStatus, CoreError> {
        let target = event.target();

        if policy == DecisionPolicy::Terminal && current.is_decided() {
            return Err(CoreError::InvalidStateTransition {
                from: current,
                to: target,
            });
        }

        tracing::debug!(
            from = %current,
            to = %target,
            event = ?event,
            "acceptance status transition"
        );

        Ok(target)
    }

    /// Check if a transition is allowed without performing it.
    pub fn can_transition(
        current: AcceptanceStatus,
        event: DecisionEvent,
        policy: DecisionPolicy,
    ) -> bool {
        Self::transition(current, event, policy).is_ok()
    }
}
