//! Column decoding that tolerates the common Postgres types for each
//! column (int4/int8 ids, numeric/float prices, timestamp/timestamptz
//! dates).

use crate::models::{format_timestamp, format_timestamp_utc, price_to_f64};
use bigdecimal::BigDecimal;
use chrono::{DateTime, NaiveDateTime, Utc};
use sqlx::Row;
use sqlx::postgres::PgRow;

pub(crate) fn get_id(row: &PgRow, column: &str) -> Result<i64, sqlx::Error> {
    if let Ok(v) = row.try_get::<i64, _>(column) {
        return Ok(v);
    }
    row.try_get::<i32, _>(column).map(i64::from)
}

pub(crate) fn get_text(row: &PgRow, column: &str) -> Result<Option<String>, sqlx::Error> {
    row.try_get::<Option<String>, _>(column)
}

pub(crate) fn get_price(row: &PgRow, column: &str) -> Result<f64, crate::StoreError> {
    if let Ok(v) = row.try_get::<Option<BigDecimal>, _>(column) {
        return price_to_f64(v.as_ref());
    }
    if let Ok(v) = row.try_get::<Option<f64>, _>(column) {
        return Ok(v.unwrap_or(0.0));
    }
    row.try_get::<Option<f32>, _>(column)
        .map(|v| v.map(f64::from).unwrap_or(0.0))
        .map_err(|e| crate::StoreError::Decode(e.to_string()))
}

pub(crate) fn get_timestamp(row: &PgRow, column: &str) -> Result<Option<String>, sqlx::Error> {
    if let Ok(v) = row.try_get::<Option<NaiveDateTime>, _>(column) {
        return Ok(v.as_ref().map(format_timestamp));
    }
    row.try_get::<Option<DateTime<Utc>>, _>(column)
        .map(|v| v.as_ref().map(format_timestamp_utc))
}
