//! # calabaceira-store
//!
//! Postgres data access for the Calabaceira sales tools.
//!
//! [`SalesStore`] is an explicitly owned handle around a connection pool.
//! It is created once at startup, cloned into whatever needs it, and
//! closed once at shutdown. Every tool call checks out its own connection,
//! so concurrent calls never share cursor state.
//!
//! The tables are assumed to exist already:
//!
//! ```text
//! customers(customer_id PK, first_name, last_name, address, city, country, phone_number, email)
//! products(product_id PK, product_name, price, category)
//! orders(order_id PK, customer_id FK, product_id FK, order_date)
//! ```

use async_trait::async_trait;
use calabaceira_core::UpstreamConfig;
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, Transaction};
use std::time::Duration;

mod customers;
pub mod error;
pub mod models;
mod orders;
mod products;
mod row;

pub use error::StoreError;
pub use models::{Customer, NewCustomer, OrderSummary, Product};

/// The four sales operations, as seen by the tool dispatcher.
#[async_trait]
pub trait SalesRepository: Send + Sync {
    /// Every row of `customers`, in the database's natural order.
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError>;

    /// Insert a customer and return the stored row.
    async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, StoreError>;

    /// Every product, ordered by category then product name.
    async fn list_products(&self) -> Result<Vec<Product>, StoreError>;

    /// Record an order dated now and return it joined with its customer
    /// and product.
    async fn place_order(&self, customer_id: i64, product_id: i64)
    -> Result<OrderSummary, StoreError>;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct StoreOptions {
    /// Check that referenced customers and products exist before
    /// inserting an order.
    pub strict_references: bool,
}

/// Handle to the sales database.
#[derive(Clone)]
pub struct SalesStore {
    pool: PgPool,
    options: StoreOptions,
}

impl SalesStore {
    /// Connect using the upstream configuration.
    pub async fn connect(upstream: &UpstreamConfig) -> Result<Self, StoreError> {
        let pool = pool_options(upstream)
            .connect(&upstream.connection_string())
            .await?;
        tracing::info!(target_db = %upstream.display_target(), "Database connection established");
        Ok(Self::from_pool(pool))
    }

    /// Build a store that connects on first use.
    pub fn connect_lazy(upstream: &UpstreamConfig) -> Result<Self, StoreError> {
        let pool = pool_options(upstream).connect_lazy(&upstream.connection_string())?;
        Ok(Self::from_pool(pool))
    }

    /// Wrap an existing pool.
    pub fn from_pool(pool: PgPool) -> Self {
        Self {
            pool,
            options: StoreOptions::default(),
        }
    }

    pub fn with_options(mut self, options: StoreOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> StoreOptions {
        self.options
    }

    /// The underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Close every connection. Safe to call more than once, and after a
    /// connection error.
    pub async fn close(&self) {
        if self.pool.is_closed() {
            return;
        }
        self.pool.close().await;
        tracing::info!("Database connection closed");
    }

    /// Round-trip a trivial query.
    pub async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }

    /// Check that each sales table can be queried. Returns the row count
    /// per table.
    pub async fn check_tables(&self) -> Result<Vec<(&'static str, i64)>, StoreError> {
        let mut counts = Vec::new();
        for table in ["customers", "products", "orders"] {
            let sql = format!("SELECT count(*)::bigint FROM {}", table);
            let (count,): (i64,) = sqlx::query_as(&sql).fetch_one(&self.pool).await?;
            counts.push((table, count));
        }
        Ok(counts)
    }
}

#[async_trait]
impl SalesRepository for SalesStore {
    async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        SalesStore::list_customers(self).await
    }

    async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        SalesStore::insert_customer(self, customer).await
    }

    async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        SalesStore::list_products(self).await
    }

    async fn place_order(
        &self,
        customer_id: i64,
        product_id: i64,
    ) -> Result<OrderSummary, StoreError> {
        SalesStore::place_order(self, customer_id, product_id).await
    }
}

fn pool_options(upstream: &UpstreamConfig) -> PgPoolOptions {
    PgPoolOptions::new()
        .max_connections(upstream.pool.max_connections)
        .min_connections(upstream.pool.min_connections)
        .acquire_timeout(Duration::from_secs(upstream.pool.acquire_timeout_seconds))
}

/// Roll back after a failed step. A failed rollback is only logged: the
/// connection is discarded by the pool in that case.
pub(crate) async fn rollback(tx: Transaction<'static, Postgres>, operation: &str) {
    if let Err(e) = tx.rollback().await {
        tracing::warn!(operation, error = %e, "Rollback failed");
    }
}
