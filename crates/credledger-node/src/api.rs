//! HTTP API server for the Credledger node.
//!
//! `invoke` runs a named operation and commits it, `query` runs a read-only
//! operation without committing, and `health` reports liveness.

use axum::{extract::State, http::StatusCode, routing::get, routing::post, Json, Router};
use credledger_registry::RegistryError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::net::TcpListener;

use crate::commands::{InvocationMode, InvokeResponse, NodeCommand};
use crate::state::NodeState;

// --- Request / response types ---

#[derive(Debug, Deserialize)]
pub struct InvokeRequest {
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
    pub code: String,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub backend: String,
    pub uptime_secs: u64,
}

type ApiError = (StatusCode, Json<ErrorResponse>);

// --- Handlers ---

async fn handle_health(State(state): State<Arc<NodeState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.backend.to_string(),
        uptime_secs: state.start_time.elapsed().as_secs(),
    })
}

async fn handle_invoke(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, ApiError> {
    send_command_and_await(&state, InvocationMode::Invoke, req).await
}

async fn handle_query(
    State(state): State<Arc<NodeState>>,
    Json(req): Json<InvokeRequest>,
) -> Result<Json<InvokeResponse>, ApiError> {
    send_command_and_await(&state, InvocationMode::Query, req).await
}

/// Send an invocation to the event loop and await the reply.
async fn send_command_and_await(
    state: &Arc<NodeState>,
    mode: InvocationMode,
    req: InvokeRequest,
) -> Result<Json<InvokeResponse>, ApiError> {
    let (reply_tx, reply_rx) = tokio::sync::oneshot::channel();

    let cmd = NodeCommand::Invoke {
        mode,
        function: req.function,
        args: req.args,
        reply: reply_tx,
    };

    state
        .command_tx
        .send(cmd)
        .await
        .map_err(|_| internal("node event loop not running"))?;

    match reply_rx.await {
        Ok(Ok(resp)) => Ok(Json(resp)),
        Ok(Err(e)) => Err(registry_error(&e)),
        Err(_) => Err(internal("event loop dropped the reply channel")),
    }
}

/// HTTP status for a registry error code.
pub fn status_for(code: &str) -> StatusCode {
    match code {
        "ALREADY_EXISTS" | "INVALID_TRANSITION" | "CONFLICT" => StatusCode::CONFLICT,
        "NOT_FOUND" => StatusCode::NOT_FOUND,
        "VALIDATION" => StatusCode::BAD_REQUEST,
        "NOT_AFFILIATED" => StatusCode::FORBIDDEN,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn registry_error(e: &RegistryError) -> ApiError {
    (
        status_for(e.code()),
        Json(ErrorResponse {
            error: e.to_string(),
            code: e.code().to_string(),
        }),
    )
}

fn internal(msg: &str) -> ApiError {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorResponse {
            error: msg.to_string(),
            code: "INTERNAL".into(),
        }),
    )
}

// --- Server ---

pub fn build_router(state: Arc<NodeState>) -> Router {
    Router::new()
        .route("/api/v1/health", get(handle_health))
        .route("/api/v1/invoke", post(handle_invoke))
        .route("/api/v1/query", post(handle_query))
        .with_state(state)
}

pub async fn serve(listener: TcpListener, state: Arc<NodeState>) -> anyhow::Result<()> {
    let app = build_router(state);
    tracing::info!(listen_addr = %listener.local_addr()?, "HTTP API server started");
    axum::serve(listener, app).await?;
    Ok(())
}
