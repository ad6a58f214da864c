//! Order tool tests.
//!
//! Covers place_order success and each way a dangling reference is
//! reported: legacy text, structured error, strict not-found, and null
//! join fields when the foreign key is not enforced. Also covers a failure
//! after the order row is inserted, which must roll the row back.

use super::common::*;
use calabaceira_core::OrderFailureMode;
use calabaceira_mcp::SalesTool;
use chrono::{Local, NaiveDateTime};
use serde_json::json;

async fn seed_ana_and_widget(ctx: &TestContext) -> i64 {
    ctx.reset().await;
    insert_product(ctx, 7, "Widget", Some("12.50"), "tools").await;
    let result = call(
        &ctx.executor(),
        SalesTool::InsertCustomer,
        json!({ "customer_data": ana() }),
    )
    .await;
    assert_success(&result, "Seeding customer should succeed");
    extract_json(&result).unwrap()["customer_id"]
        .as_i64()
        .unwrap()
}

pub async fn test_place_order(ctx: &TestContext) {
    println!("  🧪 test_place_order");
    let customer_id = seed_ana_and_widget(ctx).await;

    let result = call(
        &ctx.executor(),
        SalesTool::PlaceOrder,
        json!({ "customer_id": customer_id, "product_id": 7 }),
    )
    .await;
    assert_success(&result, "Order should succeed");

    let order = extract_json(&result).unwrap();
    assert!(order["order_id"].as_i64().unwrap() > 0);
    assert_eq!(order["customer_name"], "Ana Diaz");
    assert_eq!(order["customer_email"], "ana@x.com");
    assert_eq!(order["product_name"], "Widget");
    assert_eq!(order["price"], 12.5);
    assert_eq!(order["category"], "tools");

    let order_date = NaiveDateTime::parse_from_str(
        order["order_date"].as_str().unwrap(),
        "%Y-%m-%dT%H:%M:%S%.f",
    )
    .expect("order_date should be ISO-8601");
    let drift = (Local::now().naive_local() - order_date).num_seconds().abs();
    assert!(drift < 60, "order_date should be close to now, drift {}s", drift);

    assert_eq!(ctx.count("orders").await, 1);

    println!("     ✓ Order joined with customer and product");
}

pub async fn test_dangling_reference_legacy(ctx: &TestContext) {
    println!("  🧪 test_dangling_reference_legacy");
    seed_ana_and_widget(ctx).await;

    let result = call(
        &ctx.executor(),
        SalesTool::PlaceOrder,
        json!({ "customer_id": 99, "product_id": 7 }),
    )
    .await;

    assert_success(&result, "Legacy mode reports failures as success");
    assert!(
        text(&result).starts_with("Failed to place order due to database error: "),
        "unexpected text: {}",
        text(&result)
    );
    assert_eq!(ctx.count("orders").await, 0);

    println!("     ✓ Foreign key violation returned as text");
}

pub async fn test_dangling_reference_structured(ctx: &TestContext) {
    println!("  🧪 test_dangling_reference_structured");
    seed_ana_and_widget(ctx).await;

    let executor = ctx.executor_with(OrderFailureMode::Structured, false);
    let result = call(
        &executor,
        SalesTool::PlaceOrder,
        json!({ "customer_id": 1, "product_id": 999 }),
    )
    .await;

    assert_failure(&result, "Structured mode reports failures as errors");
    assert!(
        result
            .error
            .as_deref()
            .unwrap()
            .starts_with("Failed to place order due to database error: ")
    );

    println!("     ✓ Foreign key violation returned as error");
}

pub async fn test_dangling_reference_strict(ctx: &TestContext) {
    println!("  🧪 test_dangling_reference_strict");
    seed_ana_and_widget(ctx).await;

    let executor = ctx.executor_with(OrderFailureMode::Structured, true);
    let result = call(
        &executor,
        SalesTool::PlaceOrder,
        json!({ "customer_id": 99, "product_id": 7 }),
    )
    .await;

    assert_failure(&result, "Strict mode rejects unknown customers");
    assert_eq!(
        result.error.as_deref(),
        Some("Failed to place order: customer 99 not found")
    );
    assert_eq!(ctx.count("orders").await, 0);

    println!("     ✓ Unknown customer rejected before insert");
}

pub async fn test_dangling_reference_without_foreign_key(ctx: &TestContext) {
    println!("  🧪 test_dangling_reference_without_foreign_key");
    seed_ana_and_widget(ctx).await;
    sqlx::query("ALTER TABLE orders DROP CONSTRAINT orders_customer_id_fkey")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let result = call(
        &ctx.executor(),
        SalesTool::PlaceOrder,
        json!({ "customer_id": 99, "product_id": 7 }),
    )
    .await;

    assert_success(&result, "Unenforced reference should insert");
    let order = extract_json(&result).unwrap();
    assert!(order["customer_name"].is_null());
    assert!(order["customer_email"].is_null());
    assert_eq!(order["product_name"], "Widget");

    initialize_database(&ctx.pool)
        .await
        .expect("restore schema");

    println!("     ✓ Missing customer side yields null fields");
}

pub async fn test_unreadable_price_rolls_back_order(ctx: &TestContext) {
    println!("  🧪 test_unreadable_price_rolls_back_order");
    let customer_id = seed_ana_and_widget(ctx).await;
    sqlx::query("ALTER TABLE products ALTER COLUMN price TYPE text")
        .execute(&ctx.pool)
        .await
        .unwrap();
    sqlx::query("UPDATE products SET price = 'abc' WHERE product_id = 7")
        .execute(&ctx.pool)
        .await
        .unwrap();

    let result = call(
        &ctx.executor(),
        SalesTool::PlaceOrder,
        json!({ "customer_id": customer_id, "product_id": 7 }),
    )
    .await;

    assert_success(&result, "Legacy mode reports failures as success");
    assert!(
        text(&result).starts_with("Failed to place order: "),
        "unexpected text: {}",
        text(&result)
    );
    assert!(!text(&result).contains("due to database error"));
    assert_eq!(ctx.count("orders").await, 0);

    initialize_database(&ctx.pool)
        .await
        .expect("restore schema");

    println!("     ✓ Order row rolled back after the insert succeeded");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📦 Order Tests\n");

    test_place_order(ctx).await;
    test_dangling_reference_legacy(ctx).await;
    test_dangling_reference_structured(ctx).await;
    test_dangling_reference_strict(ctx).await;
    test_dangling_reference_without_foreign_key(ctx).await;
    test_unreadable_price_rolls_back_order(ctx).await;

    println!("\n✅ All order tests passed!\n");
}
