//! State shared between the HTTP handlers and the node.

use credledger_store::LedgerEvent;
use std::time::Instant;
use tokio::sync::{broadcast, mpsc};

use crate::commands::NodeCommand;

pub struct NodeState {
    /// Sends invocations to the main event loop.
    pub command_tx: mpsc::Sender<NodeCommand>,
    /// Publishes events of committed transactions.
    pub events: broadcast::Sender<LedgerEvent>,
    pub start_time: Instant,
    /// Name of the world-state backend in use.
    pub backend: &'static str,
}

impl NodeState {
    pub fn new(
        command_tx: mpsc::Sender<NodeCommand>,
        events: broadcast::Sender<LedgerEvent>,
        backend: &'static str,
    ) -> Self {
        Self {
            command_tx,
            events,
            start_time: Instant::now(),
            backend,
        }
    }

    /// Subscribe to committed ledger events.
    pub fn subscribe(&self) -> broadcast::Receiver<LedgerEvent> {
        self.events.subscribe()
    }
}
