use crate::models::{OrderSummary, customer_name};
use crate::row::{get_id, get_price, get_text, get_timestamp};
use crate::{SalesStore, StoreError, rollback};
use chrono::{Local, NaiveDateTime, SubsecRound};
use sqlx::PgConnection;

const INSERT_ORDER: &str = "INSERT INTO orders (customer_id, product_id, order_date) \
     VALUES ($1, $2, $3) RETURNING order_id";

const SELECT_ORDER: &str = r#"
    SELECT
        o.order_id,
        o.order_date,
        c.first_name,
        c.last_name,
        c.email,
        p.product_name,
        p.price,
        p.category
    FROM orders o
    LEFT JOIN customers c ON o.customer_id = c.customer_id
    LEFT JOIN products p ON o.product_id = p.product_id
    WHERE o.order_id = $1
"#;

impl SalesStore {
    pub async fn place_order(
        &self,
        customer_id: i64,
        product_id: i64,
    ) -> Result<OrderSummary, StoreError> {
        tracing::info!(customer_id, product_id, "Placing order");

        // Postgres keeps microseconds; truncate so the echoed date matches
        // the stored one.
        let order_date = Local::now().naive_local().trunc_subsecs(6);

        let mut tx = self.pool.begin().await?;
        let result = async {
            if self.options.strict_references {
                ensure_exists(&mut tx, "customer", "customers", "customer_id", customer_id)
                    .await?;
                ensure_exists(&mut tx, "product", "products", "product_id", product_id).await?;
            }
            insert_and_fetch(&mut tx, customer_id, product_id, order_date).await
        }
        .await;

        match result {
            Ok(summary) => {
                tx.commit().await?;
                tracing::info!(
                    order_id = summary.order_id,
                    customer_id,
                    product_id,
                    "Order placed"
                );
                Ok(summary)
            }
            Err(e) => {
                if e.is_database() {
                    tracing::error!(error = %e, "Database error during order placement");
                } else {
                    tracing::error!(error = %e, "Unexpected error during order placement");
                }
                rollback(tx, "place_order").await;
                Err(e)
            }
        }
    }
}

async fn ensure_exists(
    conn: &mut PgConnection,
    entity: &'static str,
    table: &str,
    key: &str,
    id: i64,
) -> Result<(), StoreError> {
    let sql = format!("SELECT EXISTS(SELECT 1 FROM {} WHERE {} = $1)", table, key);
    let (exists,): (bool,) = sqlx::query_as(&sql).bind(id).fetch_one(&mut *conn).await?;
    if exists {
        Ok(())
    } else {
        Err(StoreError::NotFound { entity, id })
    }
}

async fn insert_and_fetch(
    conn: &mut PgConnection,
    customer_id: i64,
    product_id: i64,
    order_date: NaiveDateTime,
) -> Result<OrderSummary, StoreError> {
    let row = sqlx::query(INSERT_ORDER)
        .bind(customer_id)
        .bind(product_id)
        .bind(order_date)
        .fetch_one(&mut *conn)
        .await?;
    let order_id = get_id(&row, "order_id")?;

    let row = sqlx::query(SELECT_ORDER)
        .bind(order_id)
        .fetch_one(&mut *conn)
        .await?;

    let decode = |e: sqlx::Error| StoreError::Decode(e.to_string());
    let first_name = get_text(&row, "first_name").map_err(decode)?;
    let last_name = get_text(&row, "last_name").map_err(decode)?;

    Ok(OrderSummary {
        order_id: get_id(&row, "order_id").map_err(decode)?,
        order_date: get_timestamp(&row, "order_date").map_err(decode)?,
        customer_name: customer_name(first_name.as_deref(), last_name.as_deref()),
        customer_email: get_text(&row, "email").map_err(decode)?,
        product_name: get_text(&row, "product_name").map_err(decode)?,
        price: get_price(&row, "price")?,
        category: get_text(&row, "category").map_err(decode)?,
    })
}
