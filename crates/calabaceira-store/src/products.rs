use crate::models::Product;
use crate::row::{get_id, get_price, get_text};
use crate::{SalesStore, StoreError};
use sqlx::postgres::PgRow;

const SELECT_PRODUCTS: &str = "SELECT product_id, product_name, price, category \
     FROM products ORDER BY category, product_name";

impl SalesStore {
    pub async fn list_products(&self) -> Result<Vec<Product>, StoreError> {
        tracing::info!("Listing products");

        let rows = sqlx::query(SELECT_PRODUCTS)
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Database error during product retrieval"))?;

        if rows.is_empty() {
            tracing::info!("No products found in database");
            return Ok(Vec::new());
        }

        let products = rows
            .iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .inspect_err(|e| tracing::error!(error = %e, "Unexpected error during product retrieval"))?;

        tracing::info!(count = products.len(), "Retrieved products");
        Ok(products)
    }
}

/// Decode failures here are formatting problems, not storage errors.
fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());
    Ok(Product {
        product_id: get_id(row, "product_id").map_err(decode)?,
        name: get_text(row, "product_name").map_err(decode)?,
        price: get_price(row, "price")?,
        category: get_text(row, "category").map_err(decode)?,
    })
}
