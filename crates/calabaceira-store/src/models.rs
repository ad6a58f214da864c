//! Row shapes returned by the sales tools.
//!
//! Field order matters: it is the key order callers see in each mapping.

use crate::error::StoreError;
use bigdecimal::{BigDecimal, ToPrimitive};
use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A row of the `customers` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_id: i64,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub phone_number: Option<String>,
    pub email: Option<String>,
}

/// Payload for inserting a customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewCustomer {
    pub first_name: String,
    pub last_name: String,
    pub address: String,
    pub city: String,
    pub country: String,
    pub phone_number: String,
    pub email: String,
}

impl NewCustomer {
    /// Keys a customer payload must carry.
    pub const REQUIRED_FIELDS: [&'static str; 7] = [
        "first_name",
        "last_name",
        "address",
        "city",
        "country",
        "phone_number",
        "email",
    ];

    /// Validate a caller-supplied mapping. Every required key must be
    /// present and hold a string; extra keys are ignored.
    pub fn from_value(value: &Value) -> Result<Self, StoreError> {
        let obj = value
            .as_object()
            .ok_or_else(|| StoreError::invalid_field("customer_data", "must be an object"))?;

        let field = |name: &str| -> Result<String, StoreError> {
            match obj.get(name) {
                None | Some(Value::Null) => Err(StoreError::missing_field(name)),
                Some(Value::String(s)) => Ok(s.clone()),
                Some(_) => Err(StoreError::invalid_field(name, "must be a string")),
            }
        };

        Ok(Self {
            first_name: field("first_name")?,
            last_name: field("last_name")?,
            address: field("address")?,
            city: field("city")?,
            country: field("country")?,
            phone_number: field("phone_number")?,
            email: field("email")?,
        })
    }
}

/// A row of the `products` table as reported by `get_products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub product_id: i64,
    pub name: Option<String>,
    pub price: f64,
    pub category: Option<String>,
}

/// A placed order joined with its customer and product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderSummary {
    pub order_id: i64,
    pub order_date: Option<String>,
    pub customer_name: Option<String>,
    pub customer_email: Option<String>,
    pub product_name: Option<String>,
    pub price: f64,
    pub category: Option<String>,
}

/// Null and zero prices are reported as 0.0.
pub fn price_to_f64(price: Option<&BigDecimal>) -> Result<f64, StoreError> {
    match price {
        None => Ok(0.0),
        Some(p) => p
            .to_f64()
            .ok_or_else(|| StoreError::Decode(format!("price {} is not representable", p))),
    }
}

/// Join first and last name with a single space, skipping absent parts.
pub fn customer_name(first: Option<&str>, last: Option<&str>) -> Option<String> {
    match (first, last) {
        (Some(f), Some(l)) => Some(format!("{} {}", f, l)),
        (Some(f), None) => Some(f.to_string()),
        (None, Some(l)) => Some(l.to_string()),
        (None, None) => None,
    }
}

/// ISO-8601 rendering of a naive timestamp. Fractional seconds are
/// printed as microseconds, or omitted when zero.
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    if ts.nanosecond() == 0 {
        ts.format("%Y-%m-%dT%H:%M:%S").to_string()
    } else {
        ts.format("%Y-%m-%dT%H:%M:%S%.6f").to_string()
    }
}

/// ISO-8601 rendering of a zoned timestamp.
pub fn format_timestamp_utc(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339()
}
