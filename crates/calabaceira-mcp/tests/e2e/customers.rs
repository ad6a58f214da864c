//! Customer tool tests.
//!
//! Covers get_customers and insert_customer_into_db against the reference schema.

use super::common::*;
use calabaceira_mcp::SalesTool;
use serde_json::json;

pub async fn test_empty_customer_list(ctx: &TestContext) {
    println!("  🧪 test_empty_customer_list");
    ctx.reset().await;

    let result = call(&ctx.executor(), SalesTool::GetCustomers, json!({})).await;

    assert_success(&result, "Listing an empty table should succeed");
    assert_eq!(extract_json(&result), Some(json!([])));

    println!("     ✓ Empty table returns an empty list");
}

pub async fn test_insert_then_list(ctx: &TestContext) {
    println!("  🧪 test_insert_then_list");
    ctx.reset().await;
    let executor = ctx.executor();

    let result = call(
        &executor,
        SalesTool::InsertCustomer,
        json!({ "customer_data": ana() }),
    )
    .await;
    assert_success(&result, "Insert should succeed");

    let stored = extract_json(&result).expect("Should have JSON response");
    assert!(stored["customer_id"].as_i64().unwrap() > 0);
    for (key, value) in ana().as_object().unwrap() {
        assert_eq!(&stored[key], value, "field {} should be echoed", key);
    }

    let listed = call(&executor, SalesTool::GetCustomers, json!({})).await;
    assert_success(&listed, "List should succeed");
    let customers = extract_json(&listed).unwrap();
    assert!(
        customers.as_array().unwrap().contains(&stored),
        "listed customers should contain {}",
        stored
    );

    println!("     ✓ Inserted customer is visible in the listing");
}

pub async fn test_insert_ignores_extra_keys(ctx: &TestContext) {
    println!("  🧪 test_insert_ignores_extra_keys");
    ctx.reset().await;

    let mut payload = ana();
    payload["loyalty_tier"] = json!("gold");
    let result = call(
        &ctx.executor(),
        SalesTool::InsertCustomer,
        json!({ "customer_data": payload }),
    )
    .await;

    assert_success(&result, "Extra keys should be ignored");
    let stored = extract_json(&result).unwrap();
    assert!(stored.get("loyalty_tier").is_none());

    println!("     ✓ Unknown keys are dropped");
}

pub async fn test_insert_missing_field_writes_nothing(ctx: &TestContext) {
    println!("  🧪 test_insert_missing_field_writes_nothing");
    ctx.reset().await;

    let mut payload = ana();
    payload.as_object_mut().unwrap().remove("email");
    let result = call(
        &ctx.executor(),
        SalesTool::InsertCustomer,
        json!({ "customer_data": payload }),
    )
    .await;

    assert_failure(&result, "Missing email should be rejected");
    assert_eq!(
        result.error.as_deref(),
        Some("Invalid customer data: email: missing required field")
    );
    assert_eq!(ctx.count("customers").await, 0);

    println!("     ✓ Validation failure leaves no row behind");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📦 Customer Tests\n");

    test_empty_customer_list(ctx).await;
    test_insert_then_list(ctx).await;
    test_insert_ignores_extra_keys(ctx).await;
    test_insert_missing_field_writes_nothing(ctx).await;

    println!("\n✅ All customer tests passed!\n");
}
