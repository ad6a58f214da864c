//! Product tool tests.
//!
//! Covers ordering and NUMERIC price handling in get_products.

use super::common::*;
use calabaceira_mcp::SalesTool;
use serde_json::json;

pub async fn test_empty_product_list(ctx: &TestContext) {
    println!("  🧪 test_empty_product_list");
    ctx.reset().await;

    let result = call(&ctx.executor(), SalesTool::GetProducts, json!({})).await;

    assert_success(&result, "Empty product table is not a failure");
    assert_eq!(extract_json(&result), Some(json!([])));
    assert_eq!(result.structured_content, Some(json!({ "result": [] })));

    println!("     ✓ Empty table returns an empty list");
}

pub async fn test_products_sorted_by_category_then_name(ctx: &TestContext) {
    println!("  🧪 test_products_sorted_by_category_then_name");
    ctx.reset().await;
    insert_product(ctx, 1, "Widget", Some("12.50"), "tools").await;
    insert_product(ctx, 2, "Apple", Some("0.99"), "food").await;
    insert_product(ctx, 3, "Hammer", Some("20.00"), "tools").await;

    let result = call(&ctx.executor(), SalesTool::GetProducts, json!({})).await;
    assert_success(&result, "List products should succeed");

    let products = extract_json(&result).unwrap();
    let names: Vec<&str> = products
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["Apple", "Hammer", "Widget"]);

    println!("     ✓ Products ordered by (category, name)");
}

pub async fn test_price_conversion(ctx: &TestContext) {
    println!("  🧪 test_price_conversion");
    ctx.reset().await;
    insert_product(ctx, 1, "Free sample", None, "a").await;
    insert_product(ctx, 2, "Giveaway", Some("0"), "b").await;
    insert_product(ctx, 7, "Widget", Some("12.50"), "tools").await;

    let result = call(&ctx.executor(), SalesTool::GetProducts, json!({})).await;
    let products = extract_json(&result).unwrap();

    assert_eq!(products[0]["price"], 0.0);
    assert_eq!(products[1]["price"], 0.0);
    assert_eq!(
        products[2],
        json!({ "product_id": 7, "name": "Widget", "price": 12.5, "category": "tools" })
    );

    println!("     ✓ Null and zero prices are 0.0, others are floats");
}

pub async fn run_all_tests(ctx: &TestContext) {
    println!("\n📦 Product Tests\n");

    test_empty_product_list(ctx).await;
    test_products_sorted_by_category_then_name(ctx).await;
    test_price_conversion(ctx).await;

    println!("\n✅ All product tests passed!\n");
}
