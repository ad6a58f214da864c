//! Calabaceira CLI - MCP server for the sales database.

use clap::{Parser, Subcommand};

mod commands;
pub(crate) mod shared;

/// Calabaceira - customer, product and order tools for AI agents.
#[derive(Debug, Parser)]
#[command(name = "calabaceira", version, about)]
struct Cli {
    /// Configuration file path (YAML, or TOML with a .toml extension).
    #[arg(short, long, global = true, env = "CALABACEIRA_CONFIG")]
    config: Option<std::path::PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Start the MCP server over HTTP or stdio.
    Serve(commands::serve::ServeArgs),
    /// Print the tool definitions as JSON.
    Tools(commands::tools::ToolsArgs),
    /// Connect to the database and verify the sales tables are reachable.
    Check(commands::check::CheckArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = shared::load_config(cli.config.as_deref())?;

    match &cli.command {
        Commands::Serve(args) => {
            args.apply(&mut config)?;
            shared::init_logging(&config.logging);
            commands::serve::execute(config).await
        }
        Commands::Tools(args) => commands::tools::execute(args),
        Commands::Check(args) => {
            args.apply(&mut config);
            shared::init_logging(&config.logging);
            commands::check::execute(&config).await
        }
    }
}
