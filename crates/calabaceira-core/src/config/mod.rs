//! Configuration types for the Calabaceira sales server.
//!
//! Configuration is loaded from a single YAML or TOML file (chosen by file
//! extension). Every section has defaults, so an empty file is a valid
//! configuration that serves over HTTP on `127.0.0.1:8000` against the
//! local `calabaceira_sales` database.
//!
//! ```yaml
//! upstream:
//!   database_url_env: DATABASE_URL
//!   database: calabaceira_sales
//!   pool:
//!     max_connections: 5
//! mcp:
//!   transport: http
//!   port: 8000
//! tools:
//!   order_failure_mode: legacy
//!   strict_references: false
//! logging:
//!   level: info
//! ```

pub mod mcp;
pub mod tools;
pub mod upstream;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

pub use mcp::{McpConfig, Transport};
pub use tools::{OrderFailureMode, ToolsConfig};
pub use upstream::{ConnectionPoolConfig, UpstreamConfig};

/// Complete server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SalesConfig {
    /// Project name, reported in the MCP server info.
    #[serde(default)]
    pub project: Option<String>,

    /// Upstream Postgres connection.
    #[serde(default)]
    pub upstream: UpstreamConfig,

    /// MCP server settings.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Tool behaviour.
    #[serde(default)]
    pub tools: ToolsConfig,

    /// Log output settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Log output configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive, used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl SalesConfig {
    /// Load configuration from a file. `.toml` files are parsed as TOML,
    /// anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)?;
        let config = if path.extension().map(|e| e == "toml").unwrap_or(false) {
            Self::from_toml(&content)?
        } else {
            Self::from_yaml(&content)?
        };
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        // An empty document deserializes to unit, not a map.
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Parse configuration from TOML content.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(ConfigError::from)
    }

    /// Load from `path` if it exists, otherwise fall back to defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Check values that serde cannot.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.upstream.pool.max_connections == 0 {
            return Err(ConfigError::Config(
                "upstream.pool.max_connections must be at least 1".to_string(),
            ));
        }
        if self.upstream.pool.min_connections > self.upstream.pool.max_connections {
            return Err(ConfigError::Config(
                "upstream.pool.min_connections exceeds max_connections".to_string(),
            ));
        }
        if !self.mcp.path.starts_with('/') {
            return Err(ConfigError::Config(format!(
                "mcp.path must start with '/', got {:?}",
                self.mcp.path
            )));
        }
        Ok(())
    }

    /// Server name reported to MCP clients.
    pub fn server_name(&self) -> &str {
        self.project.as_deref().unwrap_or("calabaceira_sales")
    }
}
