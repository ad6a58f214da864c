//! Shared test infrastructure for Calabaceira MCP end-to-end tests.
//!
//! This module provides:
//! - Docker container management for PostgreSQL
//! - Test fixtures (schema, customers, products)
//! - Helper functions for test assertions

use calabaceira_core::OrderFailureMode;
use calabaceira_mcp::SalesTool;
use calabaceira_mcp::executor::{ExecutionResult, ToolExecutor};
use calabaceira_store::{SalesStore, StoreOptions};
use serde_json::{Value, json};
use sqlx::PgPool;
use std::process::Command;
use std::sync::Arc;
use std::time::Duration;

// =============================================================================
// DOCKER CONTAINER CONFIGURATION
// =============================================================================

pub const CONTAINER_NAME: &str = "calabaceira_test_postgres";
pub const POSTGRES_PORT: u16 = 5434;
pub const POSTGRES_PASSWORD: &str = "calabaceira_test_password";
pub const DATABASE_NAME: &str = "calabaceira_test";

pub fn database_url() -> String {
    format!(
        "postgres://postgres:{}@localhost:{}/{}",
        POSTGRES_PASSWORD, POSTGRES_PORT, DATABASE_NAME
    )
}

// =============================================================================
// DOCKER CONTAINER MANAGEMENT
// =============================================================================

/// Start a PostgreSQL container for testing
pub fn start_postgres_container() -> Result<(), String> {
    let output = Command::new("docker")
        .args(["ps", "-a", "-q", "-f", &format!("name={}", CONTAINER_NAME)])
        .output()
        .map_err(|e| format!("Failed to check existing container: {}", e))?;

    let container_exists = !String::from_utf8_lossy(&output.stdout).trim().is_empty();

    if container_exists {
        let _ = Command::new("docker")
            .args(["rm", "-f", CONTAINER_NAME])
            .output();
    }

    let status = Command::new("docker")
        .args([
            "run",
            "-d",
            "--name",
            CONTAINER_NAME,
            "-e",
            &format!("POSTGRES_PASSWORD={}", POSTGRES_PASSWORD),
            "-e",
            &format!("POSTGRES_DB={}", DATABASE_NAME),
            "-p",
            &format!("{}:5432", POSTGRES_PORT),
            "postgres:16-alpine",
        ])
        .status()
        .map_err(|e| format!("Failed to start container: {}", e))?;

    if !status.success() {
        return Err("Failed to start PostgreSQL container".to_string());
    }

    Ok(())
}

/// Stop and remove the PostgreSQL container
pub fn stop_postgres_container() {
    let _ = Command::new("docker")
        .args(["rm", "-f", CONTAINER_NAME])
        .output();
}

/// Wait for PostgreSQL to be ready
pub async fn wait_for_postgres() -> Result<PgPool, String> {
    for attempt in 1..=30 {
        match PgPool::connect(&database_url()).await {
            Ok(pool) => {
                if sqlx::query("SELECT 1").fetch_one(&pool).await.is_ok() {
                    println!("✅ PostgreSQL ready after {} attempts", attempt);
                    return Ok(pool);
                }
            }
            Err(_) => {
                if attempt % 5 == 0 {
                    println!("⏳ Waiting for PostgreSQL... (attempt {})", attempt);
                }
            }
        }
        tokio::time::sleep(Duration::from_millis(500)).await;
    }
    Err("PostgreSQL did not become ready in time".to_string())
}

// =============================================================================
// DATABASE INITIALIZATION
// =============================================================================

const SCHEMA_SQL: &str = include_str!("../../../../../database/schema.sql");

pub async fn initialize_database(pool: &PgPool) -> Result<(), sqlx::Error> {
    sqlx::raw_sql(SCHEMA_SQL).execute(pool).await?;
    println!("✅ Database initialized with schema");
    Ok(())
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub pool: PgPool,
}

impl TestContext {
    pub async fn setup() -> Result<Self, String> {
        start_postgres_container()?;
        let pool = wait_for_postgres().await?;
        initialize_database(&pool)
            .await
            .map_err(|e| format!("Failed to initialize database: {}", e))?;
        Ok(Self { pool })
    }

    /// Empty every table and restart the id sequences.
    pub async fn reset(&self) {
        sqlx::query("TRUNCATE orders, products, customers RESTART IDENTITY CASCADE")
            .execute(&self.pool)
            .await
            .expect("truncate tables");
    }

    /// Store sharing the test pool.
    pub fn store(&self, strict_references: bool) -> SalesStore {
        SalesStore::from_pool(self.pool.clone()).with_options(StoreOptions { strict_references })
    }

    /// Create an executor with explicit order settings
    pub fn executor_with(&self, mode: OrderFailureMode, strict_references: bool) -> ToolExecutor {
        ToolExecutor::new(Arc::new(self.store(strict_references))).with_order_failure_mode(mode)
    }

    /// Create an executor with the default settings
    pub fn executor(&self) -> ToolExecutor {
        self.executor_with(OrderFailureMode::Legacy, false)
    }

    pub async fn count(&self, table: &str) -> i64 {
        let sql = format!("SELECT count(*)::bigint FROM {}", table);
        let (count,): (i64,) = sqlx::query_as(&sql)
            .fetch_one(&self.pool)
            .await
            .expect("count rows");
        count
    }
}

impl Drop for TestContext {
    fn drop(&mut self) {
        stop_postgres_container();
        println!("🧹 Cleaned up PostgreSQL container");
    }
}

// =============================================================================
// FIXTURES
// =============================================================================

pub fn ana() -> Value {
    json!({
        "first_name": "Ana",
        "last_name": "Diaz",
        "address": "1 Main",
        "city": "Lisbon",
        "country": "PT",
        "phone_number": "555",
        "email": "ana@x.com"
    })
}

/// Insert a product directly. `price` is a decimal literal or `None` for null.
pub async fn insert_product(
    ctx: &TestContext,
    product_id: i32,
    name: &str,
    price: Option<&str>,
    category: &str,
) {
    sqlx::query(
        "INSERT INTO products (product_id, product_name, price, category) \
         VALUES ($1, $2, $3::numeric, $4)",
    )
    .bind(product_id)
    .bind(name)
    .bind(price)
    .bind(category)
    .execute(&ctx.pool)
    .await
    .expect("insert product");
}

// =============================================================================
// RESULT HELPERS
// =============================================================================

pub async fn call(executor: &ToolExecutor, tool: SalesTool, arguments: Value) -> ExecutionResult {
    executor.execute(&tool.definition(), arguments).await
}

/// Extract JSON from execution result
pub fn extract_json(result: &ExecutionResult) -> Option<Value> {
    result
        .content
        .first()
        .and_then(|c| serde_json::from_str(c.text()).ok())
}

/// Text of the first content item
pub fn text(result: &ExecutionResult) -> &str {
    result.content.first().map(|c| c.text()).unwrap_or_default()
}

/// Assert that a result is successful
pub fn assert_success(result: &ExecutionResult, msg: &str) {
    assert!(result.success, "{}: {:?}", msg, result);
}

/// Assert that a result is a failure
pub fn assert_failure(result: &ExecutionResult, msg: &str) {
    assert!(!result.success, "{}: {:?}", msg, result);
}
