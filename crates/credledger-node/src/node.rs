//! The Credledger node host.
//!
//! Owns the world state and runs every invocation through a single command
//! loop, so invocations never interleave. Each one gets its own transaction
//! context stamped with a v7 UUID and the host clock.

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};

use credledger_registry::{CredentialContract, Operation, RegistryError};
use credledger_store::{LedgerEvent, MemoryStore, RocksStore, StateStore, TxContext, TxTimestamp};

use crate::commands::{InvocationMode, InvokeResponse, NodeCommand};
use crate::config::{CredledgerConfig, StorageBackend};
use crate::state::NodeState;

/// The Credledger node: world state, contract, and HTTP API.
pub struct CredledgerNode {
    config: CredledgerConfig,
    store: Arc<dyn StateStore>,
    contract: Arc<CredentialContract>,
    /// Shared state accessible from HTTP handlers.
    node_state: Arc<NodeState>,
    /// Receives commands from the HTTP API.
    command_rx: Option<mpsc::Receiver<NodeCommand>>,
}

impl CredledgerNode {
    /// Open the configured backend and prepare the command channel.
    pub fn new(config: CredledgerConfig) -> Result<Self> {
        let (store, backend): (Arc<dyn StateStore>, &'static str) = match config.storage.backend {
            StorageBackend::Rocksdb => {
                let store = RocksStore::open(&config.storage.data_dir)?;
                tracing::info!(path = %config.storage.data_dir.display(), "rocksdb world state opened");
                (Arc::new(store), "rocksdb")
            }
            StorageBackend::Memory => {
                tracing::warn!("using in-memory world state; nothing will be persisted");
                (Arc::new(MemoryStore::new()), "memory")
            }
        };

        let contract = Arc::new(CredentialContract::new(&config.ledger.rules));
        let (command_tx, command_rx) = mpsc::channel::<NodeCommand>(256);
        let (events, _) = broadcast::channel(config.ledger.event_channel_capacity.max(1));
        let node_state = Arc::new(NodeState::new(command_tx, events, backend));

        tracing::info!(
            backend,
            policy = ?contract.manager().policy(),
            require_relationship = config.ledger.rules.require_relationship,
            "Credledger node created"
        );

        Ok(Self {
            config,
            store,
            contract,
            node_state,
            command_rx: Some(command_rx),
        })
    }

    /// Spawn the HTTP API server.
    pub async fn start(&mut self) -> Result<()> {
        let api_addr: SocketAddr = self.config.api_socket_addr().parse()?;
        let listener = tokio::net::TcpListener::bind(api_addr).await?;

        let api_state = self.node_state.clone();
        tokio::spawn(async move {
            if let Err(e) = crate::api::serve(listener, api_state).await {
                tracing::error!(error = %e, "HTTP API server error");
            }
        });

        Ok(())
    }

    /// Run the main event loop until the command channel closes.
    pub async fn run(&mut self) -> Result<()> {
        let mut command_rx = self
            .command_rx
            .take()
            .ok_or_else(|| anyhow::anyhow!("node event loop already running"))?;

        let store = self.store.clone();
        let contract = self.contract.clone();
        let events = self.node_state.events.clone();

        tracing::info!("entering main event loop");

        while let Some(cmd) = command_rx.recv().await {
            Self::handle_api_command(cmd, store.as_ref(), &contract, &events);
        }

        tracing::info!("API command channel closed");
        Ok(())
    }

    /// Gracefully shut down the node.
    pub async fn shutdown(&mut self) -> Result<()> {
        tracing::info!("shutting down Credledger node");
        self.command_rx = None;
        tracing::info!("Credledger node shut down");
        Ok(())
    }

    pub fn node_state(&self) -> Arc<NodeState> {
        self.node_state.clone()
    }

    fn handle_api_command(
        cmd: NodeCommand,
        store: &dyn StateStore,
        contract: &CredentialContract,
        events: &broadcast::Sender<LedgerEvent>,
    ) {
        match cmd {
            NodeCommand::Invoke {
                mode,
                function,
                args,
                reply,
            } => {
                let result = Self::execute(store, contract, events, mode, &function, &args);
                if let Err(e) = &result {
                    tracing::warn!(function = %function, code = e.code(), error = %e, "invocation failed");
                }
                let _ = reply.send(result);
            }
        }
    }

    fn execute(
        store: &dyn StateStore,
        contract: &CredentialContract,
        events: &broadcast::Sender<LedgerEvent>,
        mode: InvocationMode,
        function: &str,
        args: &[String],
    ) -> Result<InvokeResponse, RegistryError> {
        let op: Operation = function.parse()?;
        if mode == InvocationMode::Query && !op.is_read_only() {
            return Err(RegistryError::Validation(format!(
                "{} changes state and must be invoked, not queried",
                op
            )));
        }

        let tx_id = uuid::Uuid::now_v7().to_string();
        let tx = TxContext::new(store, tx_id.clone(), TxTimestamp::now());
        let result = contract.invoke(&tx, op.name(), args)?;

        if mode == InvocationMode::Query {
            return Ok(InvokeResponse {
                tx_id,
                committed: false,
                event: None,
                result,
            });
        }

        let receipt = tx
            .commit()
            .map_err(|source| RegistryError::Store { op: op.name(), source })?;

        tracing::debug!(tx_id = %receipt.tx_id, writes = receipt.writes, "invocation committed");

        let event_name = receipt.event.map(|event| {
            let name = event.name.clone();
            tracing::info!(tx_id = %receipt.tx_id, event = %name, "ledger event emitted");
            // No subscribers is not an error.
            let _ = events.send(event);
            name
        });

        Ok(InvokeResponse {
            tx_id: receipt.tx_id,
            committed: true,
            event: event_name,
            result,
        })
    }
}
