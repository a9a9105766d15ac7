//! Commands dispatched from the HTTP API to the node event loop.

use credledger_registry::{RegistryError, Response};
use serde::Serialize;
use tokio::sync::oneshot;

/// Whether an invocation may change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InvocationMode {
    /// Run and commit.
    Invoke,
    /// Run read-only operations; never committed.
    Query,
}

/// A command sent from the HTTP API to the node's main event loop.
pub enum NodeCommand {
    /// Run a named ledger operation in a fresh transaction.
    Invoke {
        mode: InvocationMode,
        function: String,
        args: Vec<String>,
        reply: oneshot::Sender<Result<InvokeResponse, RegistryError>>,
    },
}

/// Outcome of a successful invocation.
#[derive(Debug, Clone, Serialize)]
pub struct InvokeResponse {
    pub tx_id: String,
    /// Whether the transaction's writes were committed.
    pub committed: bool,
    /// Name of the event emitted on commit, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    pub result: Response,
}
