//! Error types for the MCP crate.

use crate::protocol::codes;
use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Unknown JSON-RPC method.
    #[error("method not found: {0}")]
    MethodNotFound(String),

    /// Tool not found.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// Invalid parameters for a method.
    #[error("invalid params: {0}")]
    InvalidParams(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl McpError {
    /// JSON-RPC error code for this error.
    pub fn code(&self) -> i32 {
        match self {
            McpError::MethodNotFound(_) => codes::METHOD_NOT_FOUND,
            McpError::ToolNotFound { .. } | McpError::InvalidParams(_) => codes::INVALID_PARAMS,
            McpError::SerializationError(_) => codes::PARSE_ERROR,
            McpError::StartupFailed(_) | McpError::IoError(_) => codes::INTERNAL_ERROR,
        }
    }
}
