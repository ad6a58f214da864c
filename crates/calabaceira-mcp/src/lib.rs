//! # calabaceira-mcp
//!
//! MCP (Model Context Protocol) server for the Calabaceira sales database.
//!
//! This crate exposes four fixed tools to AI agents and routes each call
//! to a [`calabaceira_store::SalesRepository`]. It supports:
//!
//! - **Schema-checked arguments**: required keys and JSON types are
//!   validated before any query runs
//! - **Multiple Transports**: stdio and HTTP
//! - **Configurable order failures**: legacy success-text or structured errors
//!
//! ## Architecture
//!
//! ```text
//! AI Agent (Claude, GPT, etc.)
//!       │
//!       │ MCP protocol (list tools / call tool)
//!       ▼
//! ┌──────────────────────┐
//! │ Calabaceira MCP      │
//! │  1. Look up tool     │  ← catalog
//! │  2. Check arguments  │
//! │  3. Run operation    │  ← calabaceira-store
//! │  4. Return JSON      │
//! └──────────┬───────────┘
//!            │
//!            ▼
//!     Postgres (customers, products, orders)
//! ```
//!
//! ## Tools
//!
//! | Tool | Arguments | Description |
//! |------|-----------|-------------|
//! | `get_customers` | none | Every registered customer |
//! | `insert_customer_into_db` | `customer_data` | Add a customer, return the stored row |
//! | `get_products` | none | Products ordered by category and name |
//! | `place_order` | `customer_id`, `product_id` | Record an order dated now |
//!
//! ## Example Usage
//!
//! ```ignore
//! use calabaceira_core::SalesConfig;
//! use calabaceira_mcp::McpServer;
//! use calabaceira_store::SalesStore;
//! use std::sync::Arc;
//!
//! let config = SalesConfig::from_file("calabaceira.yaml")?;
//! let store = SalesStore::connect(&config.upstream).await?;
//!
//! let server = McpServer::new(config.mcp.clone())
//!     .with_repository(Arc::new(store.clone()))
//!     .with_order_failure_mode(config.tools.order_failure_mode);
//!
//! server.run().await?;
//! store.close().await;
//! ```

pub mod catalog;
pub mod error;
pub mod executor;
pub mod http_transport;
pub mod protocol;
pub mod server;
pub mod tools;

// Re-export main types
pub use catalog::SalesTool;
pub use error::McpError;
pub use executor::{ExecutionResult, ToolExecutor};
pub use protocol::{
    CallToolParams, CallToolResponse, JsonRpcRequest, JsonRpcResponse, ToolAnnotations,
    ToolContent, ToolDefinition,
};
pub use server::McpServer;
pub use tools::ToolRegistry;
