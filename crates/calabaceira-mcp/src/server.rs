//! MCP server implementation.
//!
//! This module provides the main MCP server that handles tool discovery
//! and execution over stdio or HTTP.

use crate::error::McpError;
use crate::executor::{ExecutionResult, ToolExecutor};
use crate::http_transport::HttpServer;
use crate::protocol::*;
use crate::tools::ToolRegistry;
use calabaceira_core::{McpConfig, OrderFailureMode, Transport};
use calabaceira_store::SalesRepository;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;

/// Channel item handed from the HTTP transport to the dispatcher task.
/// The reply is `None` for notifications.
pub type RequestEnvelope = (JsonRpcRequest, mpsc::Sender<Option<JsonRpcResponse>>);

/// The MCP server.
#[derive(Clone)]
pub struct McpServer {
    config: McpConfig,
    server_name: String,
    tools: ToolRegistry,
    executor: Option<ToolExecutor>,
}

impl McpServer {
    /// Create a new MCP server exposing the sales tools.
    pub fn new(config: McpConfig) -> Self {
        Self {
            config,
            server_name: "calabaceira_sales".to_string(),
            tools: ToolRegistry::sales(),
            executor: None,
        }
    }

    /// Set the name reported in `serverInfo`.
    pub fn with_server_name(mut self, name: impl Into<String>) -> Self {
        self.server_name = name.into();
        self
    }

    /// Set the repository the tools run against.
    pub fn with_repository(mut self, repository: Arc<dyn SalesRepository>) -> Self {
        let mode = self
            .executor
            .as_ref()
            .map(ToolExecutor::order_failure_mode)
            .unwrap_or_default();
        self.executor = Some(ToolExecutor::new(repository).with_order_failure_mode(mode));
        self
    }

    /// Set how `place_order` reports failures. Applies to the current
    /// repository, so call after [`McpServer::with_repository`].
    pub fn with_order_failure_mode(mut self, mode: OrderFailureMode) -> Self {
        self.executor = self
            .executor
            .map(|executor| executor.with_order_failure_mode(mode));
        self
    }

    /// Start the MCP server.
    pub async fn run(&self) -> Result<(), McpError> {
        match self.config.transport {
            Transport::Stdio => self.run_stdio().await,
            Transport::Http => self.run_http().await,
        }
    }

    /// Run the server with stdio transport. Returns when stdin closes.
    async fn run_stdio(&self) -> Result<(), McpError> {
        tracing::info!(tools = self.tools.len(), "Starting MCP server with stdio transport");
        self.serve_lines(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
            .await?;
        tracing::info!("stdin closed, stopping MCP server");
        Ok(())
    }

    /// Serve line-delimited JSON-RPC until `reader` reaches end of input.
    ///
    /// Each line gets at most one response line. Notifications get none, and
    /// a line that is not valid UTF-8 or JSON gets a parse error. Only IO
    /// errors on `reader` or `writer` end the loop early.
    pub async fn serve_lines<R, W>(&self, mut reader: R, mut writer: W) -> Result<(), McpError>
    where
        R: AsyncBufRead + Unpin,
        W: AsyncWrite + Unpin,
    {
        let mut buf = Vec::new();
        loop {
            buf.clear();
            if reader.read_until(b'\n', &mut buf).await? == 0 {
                return Ok(());
            }

            let response = match std::str::from_utf8(&buf) {
                Ok(line) if line.trim().is_empty() => continue,
                Ok(line) => match serde_json::from_str::<JsonRpcRequest>(line.trim()) {
                    Ok(request) => self.handle_message(request).await,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to parse JSON-RPC message");
                        Some(JsonRpcResponse::error(
                            None,
                            codes::PARSE_ERROR,
                            format!("Parse error: {}", e),
                        ))
                    }
                },
                Err(e) => {
                    tracing::warn!(error = %e, "Received a line that is not valid UTF-8");
                    Some(JsonRpcResponse::error(
                        None,
                        codes::PARSE_ERROR,
                        format!("Parse error: {}", e),
                    ))
                }
            };

            if let Some(response) = response {
                let mut response_json = serde_json::to_string(&response)?;
                response_json.push('\n');
                writer.write_all(response_json.as_bytes()).await?;
                writer.flush().await?;
            }
        }
    }

    /// Run the server with HTTP transport.
    pub async fn run_http(&self) -> Result<(), McpError> {
        tracing::info!(
            addr = %self.config.bind_addr(),
            path = %self.config.path,
            tools = self.tools.len(),
            "Starting MCP server with HTTP transport"
        );

        // Create channel for request handling
        let (request_tx, mut request_rx) = mpsc::channel::<RequestEnvelope>(100);

        // Each request runs on its own task so a slow query does not hold
        // up the others.
        let server = Arc::new(self.clone());
        tokio::spawn(async move {
            while let Some((request, response_tx)) = request_rx.recv().await {
                let server = server.clone();
                tokio::spawn(async move {
                    let response = server.handle_message(request).await;
                    let _ = response_tx.send(response).await;
                });
            }
        });

        // Start HTTP server
        let http_server = HttpServer::new(
            self.config.bind_addr(),
            self.config.path.clone(),
            request_tx,
        );
        http_server.run().await
    }

    /// Handle a JSON-RPC message. Notifications get no response.
    pub async fn handle_message(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() {
            tracing::debug!(method = %request.method, "Received notification");
            return None;
        }
        Some(self.handle_request(request).await)
    }

    /// Handle a JSON-RPC request.
    pub async fn handle_request(&self, request: JsonRpcRequest) -> JsonRpcResponse {
        let id = request.id.clone();

        match request.method.as_str() {
            "initialize" => self.handle_initialize(id, request.params),
            "initialized" | "notifications/initialized" => JsonRpcResponse::success(id, json!({})),
            "ping" => JsonRpcResponse::success(id, json!({})),
            "tools/list" => self.handle_list_tools(id),
            "tools/call" => self.handle_call_tool(id, request.params).await,
            "shutdown" => self.handle_shutdown(id),
            _ => {
                let err = McpError::MethodNotFound(request.method);
                JsonRpcResponse::error(id, err.code(), err.to_string())
            }
        }
    }

    fn handle_initialize(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: InitializeParams = params
            .and_then(|p| serde_json::from_value(p).ok())
            .unwrap_or_default();

        if let Some(client) = &params.client_info {
            tracing::info!(
                client = %client.name,
                client_version = client.version.as_deref().unwrap_or("unknown"),
                "MCP client connected"
            );
        }

        let result = json!({
            "protocolVersion": negotiate_protocol_version(params.protocol_version.as_deref()),
            "serverInfo": {
                "name": self.server_name,
                "version": env!("CARGO_PKG_VERSION")
            },
            "capabilities": {
                "tools": {
                    "listChanged": false
                }
            }
        });
        JsonRpcResponse::success(id, result)
    }

    fn handle_list_tools(&self, id: Option<Value>) -> JsonRpcResponse {
        let result = ListToolsResponse {
            tools: self.tools.list().to_vec(),
        };
        match serde_json::to_value(result) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    async fn handle_call_tool(&self, id: Option<Value>, params: Option<Value>) -> JsonRpcResponse {
        let params: CallToolParams = match params {
            Some(p) => match serde_json::from_value(p) {
                Ok(params) => params,
                Err(e) => {
                    let err = McpError::InvalidParams(e.to_string());
                    return JsonRpcResponse::error(id, err.code(), err.to_string());
                }
            },
            None => {
                let err = McpError::InvalidParams("missing params".to_string());
                return JsonRpcResponse::error(id, err.code(), err.to_string());
            }
        };

        // Check if tool exists
        let tool = match self.tools.get(&params.name) {
            Some(t) => t.clone(),
            None => {
                let err = McpError::ToolNotFound { name: params.name };
                return JsonRpcResponse::error(id, err.code(), err.to_string());
            }
        };

        let result = match &self.executor {
            Some(executor) => executor.execute(&tool, params.arguments).await,
            None => ExecutionResult::error("Database connection not configured"),
        };

        self.execution_result_to_response(id, result)
    }

    fn execution_result_to_response(
        &self,
        id: Option<Value>,
        result: ExecutionResult,
    ) -> JsonRpcResponse {
        let response = CallToolResponse {
            content: result.content,
            structured_content: result.structured_content,
            is_error: !result.success,
        };
        match serde_json::to_value(response) {
            Ok(value) => JsonRpcResponse::success(id, value),
            Err(e) => JsonRpcResponse::error(id, codes::INTERNAL_ERROR, e.to_string()),
        }
    }

    fn handle_shutdown(&self, id: Option<Value>) -> JsonRpcResponse {
        tracing::info!("MCP server shutdown requested");
        JsonRpcResponse::success(id, json!(null))
    }
}
