use crate::models::{Customer, NewCustomer};
use crate::row::{get_id, get_text};
use crate::{SalesStore, StoreError, rollback};
use sqlx::postgres::PgRow;
use sqlx::PgConnection;

const INSERT_CUSTOMER: &str = "INSERT INTO customers \
     (first_name, last_name, address, city, country, phone_number, email) \
     VALUES ($1, $2, $3, $4, $5, $6, $7) RETURNING customer_id";

const SELECT_CUSTOMER: &str = "SELECT * FROM customers WHERE customer_id = $1";

impl SalesStore {
    pub async fn list_customers(&self) -> Result<Vec<Customer>, StoreError> {
        tracing::info!("Listing registered customers");

        let rows = sqlx::query("SELECT * FROM customers")
            .fetch_all(&self.pool)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Database error"))?;

        rows.iter()
            .map(customer_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(StoreError::from)
    }

    pub async fn insert_customer(&self, customer: &NewCustomer) -> Result<Customer, StoreError> {
        let mut tx = self.pool.begin().await?;

        match insert_and_fetch(&mut tx, customer).await {
            Ok(created) => {
                tx.commit().await?;
                tracing::info!(
                    email = %customer.email,
                    customer_id = created.customer_id,
                    "Customer added to database"
                );
                Ok(created)
            }
            Err(e) => {
                tracing::error!(error = %e, "Database error");
                rollback(tx, "insert_customer").await;
                Err(e)
            }
        }
    }
}

async fn insert_and_fetch(
    conn: &mut PgConnection,
    customer: &NewCustomer,
) -> Result<Customer, StoreError> {
    let row = sqlx::query(INSERT_CUSTOMER)
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.address)
        .bind(&customer.city)
        .bind(&customer.country)
        .bind(&customer.phone_number)
        .bind(&customer.email)
        .fetch_one(&mut *conn)
        .await?;
    let customer_id = get_id(&row, "customer_id")?;

    let row = sqlx::query(SELECT_CUSTOMER)
        .bind(customer_id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(customer_from_row(&row)?)
}

fn customer_from_row(row: &PgRow) -> Result<Customer, sqlx::Error> {
    Ok(Customer {
        customer_id: get_id(row, "customer_id")?,
        first_name: get_text(row, "first_name")?,
        last_name: get_text(row, "last_name")?,
        address: get_text(row, "address")?,
        city: get_text(row, "city")?,
        country: get_text(row, "country")?,
        phone_number: get_text(row, "phone_number")?,
        email: get_text(row, "email")?,
    })
}

