//! CLI command implementations for the Calabaceira MCP server.

pub mod check;
pub mod serve;
pub mod tools;
