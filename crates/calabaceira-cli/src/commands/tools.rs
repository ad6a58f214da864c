//! `calabaceira tools` command.
//!
//! Prints the tool definitions exactly as `tools/list` returns them. Works
//! offline.

use anyhow::{Context, Result};
use calabaceira_mcp::ToolRegistry;
use calabaceira_mcp::protocol::ListToolsResponse;
use clap::Args;

/// Print the tool definitions.
#[derive(Debug, Args)]
pub struct ToolsArgs {
    /// Only print the named tool.
    #[arg(long)]
    pub name: Option<String>,
}

/// Executes the tools command.
pub fn execute(args: &ToolsArgs) -> Result<()> {
    let registry = ToolRegistry::sales();

    let output = match &args.name {
        Some(name) => {
            let tool = registry.get(name).with_context(|| {
                format!(
                    "Unknown tool '{}'. Available: {}",
                    name,
                    registry.names().join(", ")
                )
            })?;
            serde_json::to_string_pretty(tool)?
        }
        None => serde_json::to_string_pretty(&ListToolsResponse {
            tools: registry.list().to_vec(),
        })?,
    };

    println!("{}", output);
    Ok(())
}
