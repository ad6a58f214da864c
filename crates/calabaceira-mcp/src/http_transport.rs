//! HTTP transport for MCP server.
//!
//! This module provides a JSON-RPC over HTTP transport for the MCP server,
//! allowing remote AI agents and API integrations to connect.

use crate::error::McpError;
use crate::protocol::{JsonRpcRequest, JsonRpcResponse, codes};
use crate::server::RequestEnvelope;
use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use std::sync::Arc;
use tokio::sync::mpsc;
use tower_http::trace::TraceLayer;

/// HTTP transport handler state.
pub struct HttpTransportState {
    /// Channel for sending requests to the MCP server.
    request_tx: mpsc::Sender<RequestEnvelope>,
}

impl HttpTransportState {
    /// Create a new HTTP transport state.
    pub fn new(request_tx: mpsc::Sender<RequestEnvelope>) -> Self {
        Self { request_tx }
    }
}

/// Create the HTTP router for MCP, serving JSON-RPC on `path`.
pub fn create_router(state: Arc<HttpTransportState>, path: &str) -> Router {
    Router::new()
        .route(path, post(handle_mcp_post))
        .route("/health", get(handle_health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Handle POST requests (JSON-RPC over HTTP).
async fn handle_mcp_post(State(state): State<Arc<HttpTransportState>>, body: Bytes) -> Response {
    let request = match serde_json::from_slice::<JsonRpcRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse JSON-RPC body");
            return (
                StatusCode::BAD_REQUEST,
                Json(JsonRpcResponse::error(
                    None,
                    codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                )),
            )
                .into_response();
        }
    };

    let (response_tx, mut response_rx) = mpsc::channel(1);

    // Send request to MCP server
    if state.request_tx.send((request, response_tx)).await.is_err() {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                codes::INTERNAL_ERROR,
                "MCP server unavailable",
            )),
        )
            .into_response();
    }

    // Wait for response
    match response_rx.recv().await {
        Some(Some(response)) => (StatusCode::OK, Json(response)).into_response(),
        Some(None) => StatusCode::ACCEPTED.into_response(),
        None => (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(JsonRpcResponse::error(
                None,
                codes::INTERNAL_ERROR,
                "No response from MCP server",
            )),
        )
            .into_response(),
    }
}

/// Handle health check requests.
async fn handle_health() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "service": "calabaceira-mcp",
        "version": env!("CARGO_PKG_VERSION")
    }))
}

/// HTTP server for MCP transport.
pub struct HttpServer {
    addr: String,
    path: String,
    state: Arc<HttpTransportState>,
}

impl HttpServer {
    /// Create a new HTTP server.
    pub fn new(
        addr: impl Into<String>,
        path: impl Into<String>,
        request_tx: mpsc::Sender<RequestEnvelope>,
    ) -> Self {
        Self {
            addr: addr.into(),
            path: path.into(),
            state: Arc::new(HttpTransportState::new(request_tx)),
        }
    }

    /// Run the HTTP server.
    pub async fn run(self) -> Result<(), McpError> {
        let app = create_router(self.state, &self.path);

        let listener = tokio::net::TcpListener::bind(&self.addr)
            .await
            .map_err(|e| {
                McpError::StartupFailed(format!("Failed to bind to {}: {}", self.addr, e))
            })?;

        tracing::info!(addr = %self.addr, path = %self.path, "MCP HTTP server listening");

        axum::serve(listener, app).await?;

        Ok(())
    }
}
