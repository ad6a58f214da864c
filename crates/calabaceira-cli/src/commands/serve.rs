//! `calabaceira serve` command.
//!
//! Connects to the sales database and starts the MCP server over HTTP or
//! stdio. The store is closed on every exit path.

use anyhow::{Context, Result};
use calabaceira_core::{SalesConfig, Transport};
use calabaceira_mcp::McpServer;
use calabaceira_store::{SalesStore, StoreOptions};
use clap::Args;
use std::sync::Arc;

use crate::shared;

/// Start the MCP server.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Serve over HTTP. Overrides the config file.
    #[arg(long, conflicts_with = "stdio")]
    pub http: bool,

    /// Serve over stdin/stdout. Overrides the config file.
    #[arg(long)]
    pub stdio: bool,

    /// HTTP port. Overrides the config file.
    #[arg(long)]
    pub port: Option<u16>,

    /// Database URL. Overrides the config file and DATABASE_URL.
    #[arg(long)]
    pub database_url: Option<String>,
}

impl ServeArgs {
    /// Apply command-line overrides on top of the loaded configuration.
    pub fn apply(&self, config: &mut SalesConfig) -> Result<()> {
        if self.http {
            config.mcp.transport = Transport::Http;
        }
        if self.stdio {
            config.mcp.transport = Transport::Stdio;
        }
        if let Some(port) = self.port {
            config.mcp.port = port;
        }
        if let Some(url) = &self.database_url {
            shared::override_database_url(config, url);
        }
        config.validate().context("Invalid configuration")?;
        Ok(())
    }
}

/// Executes the serve command.
pub async fn execute(config: SalesConfig) -> Result<()> {
    let store = SalesStore::connect(&config.upstream)
        .await
        .with_context(|| {
            format!(
                "Failed to connect to database at {}",
                config.upstream.display_target()
            )
        })?
        .with_options(StoreOptions {
            strict_references: config.tools.strict_references,
        });

    let server = McpServer::new(config.mcp.clone())
        .with_server_name(config.server_name())
        .with_repository(Arc::new(store.clone()))
        .with_order_failure_mode(config.tools.order_failure_mode);

    match config.mcp.transport {
        Transport::Http => tracing::info!(
            addr = %config.mcp.bind_addr(),
            path = %config.mcp.path,
            "Serving sales tools over HTTP"
        ),
        Transport::Stdio => tracing::info!("Serving sales tools over stdio"),
    }

    let outcome = tokio::select! {
        result = server.run() => result.map_err(|e| anyhow::anyhow!("server error: {e}")),
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Server stopped by user");
            Ok(())
        }
    };

    if let Err(e) = &outcome {
        tracing::error!(error = %e, "Server stopped with an error");
    }
    store.close().await;
    outcome
}
