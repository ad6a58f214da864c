//! Shared helpers for CLI commands.

use anyhow::{Context, Result};
use calabaceira_core::{LoggingConfig, SalesConfig};
use std::path::Path;
use tracing_subscriber::EnvFilter;

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "calabaceira.yaml";

/// Load configuration. An explicit path must exist; the default path may
/// be absent, in which case built-in defaults apply.
pub fn load_config(path: Option<&Path>) -> Result<SalesConfig> {
    match path {
        Some(path) => SalesConfig::from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => SalesConfig::load_or_default(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("Failed to load configuration from {}", DEFAULT_CONFIG_FILE)),
    }
}

/// Point the upstream connection at an explicit URL, ignoring the
/// environment variable.
pub fn override_database_url(config: &mut SalesConfig, url: &str) {
    config.upstream.database_url = Some(url.to_string());
    config.upstream.database_url_env = None;
}

/// Install the tracing subscriber. `RUST_LOG` wins over the configured
/// level. Output goes to stderr so stdout stays free for the stdio
/// transport.
pub fn init_logging(logging: &LoggingConfig) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&logging.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
