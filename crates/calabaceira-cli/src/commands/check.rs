//! `calabaceira check` command implementation.
//!
//! Connects with the configured settings and confirms that `customers`,
//! `products` and `orders` can be queried.

use anyhow::{Context, Result};
use calabaceira_core::SalesConfig;
use calabaceira_store::SalesStore;
use clap::Args;

use crate::shared;

/// Verify database connectivity.
#[derive(Debug, Args)]
pub struct CheckArgs {
    /// Database URL. Overrides the config file and DATABASE_URL.
    #[arg(long)]
    pub database_url: Option<String>,
}

impl CheckArgs {
    pub fn apply(&self, config: &mut SalesConfig) {
        if let Some(url) = &self.database_url {
            shared::override_database_url(config, url);
        }
    }
}

/// Executes the check command.
pub async fn execute(config: &SalesConfig) -> Result<()> {
    let target = config.upstream.display_target();
    println!("\n🔍 Checking database {}", target);

    let store = SalesStore::connect(&config.upstream)
        .await
        .with_context(|| format!("Failed to connect to database at {}", target))?;

    let result = run_checks(&store).await;
    store.close().await;

    match &result {
        Ok(()) => println!("\n✅ Database is ready for the sales tools\n"),
        Err(e) => println!("\n❌ Check failed: {:#}\n", e),
    }
    result
}

async fn run_checks(store: &SalesStore) -> Result<()> {
    store.ping().await.context("Database did not answer a ping")?;
    println!("   ✓ Connection established");

    let counts = store
        .check_tables()
        .await
        .context("Sales tables are not reachable")?;
    for (table, count) in counts {
        println!("   ✓ {:<10} {} rows", table, count);
    }
    Ok(())
}
