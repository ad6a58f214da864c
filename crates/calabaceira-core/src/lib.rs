//! Shared types for the Calabaceira sales server.

// Configuration types shared across all Calabaceira crates
pub mod config;

pub use config::{
    ConfigError, ConnectionPoolConfig, LoggingConfig, McpConfig, OrderFailureMode, SalesConfig,
    ToolsConfig, Transport, UpstreamConfig,
};
