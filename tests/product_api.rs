//! End-to-end tests for the product API
//!
//! Drives the assembled router request-by-request with tower's oneshot,
//! the same way a client would over the wire.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use stockroom::config::ServerConfig;
use stockroom::http::{AppState, HttpServer};

fn app() -> Router {
    let state = Arc::new(AppState::new());
    HttpServer::build_router(&ServerConfig::default(), state)
}

async fn send(
    router: &Router,
    method: &str,
    uri: &str,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let request = match body {
        Some(payload) => Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap(),
        None => Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

fn widget_payload(sku: &str) -> Value {
    json!({
        "name": "Widget",
        "sku": sku,
        "price": 9.99,
        "stock": 5
    })
}

async fn create(router: &Router, payload: Value) -> Value {
    let (status, body) = send(router, "POST", "/api/products", Some(payload)).await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {}", body);
    body["data"].clone()
}

#[tokio::test]
async fn create_normalizes_and_get_round_trips() {
    let router = app();
    let created = create(
        &router,
        json!({
            "name": "  Widget  ",
            "sku": "wdg-1",
            "price": 9.99,
            "stock": 5
        }),
    )
    .await;

    assert_eq!(created["sku"], "WDG-1");
    assert_eq!(created["name"], "Widget");
    assert_eq!(created["min_stock"], 5);
    assert_eq!(created["is_active"], true);

    let id = created["id"].as_str().unwrap();
    let (status, body) = send(&router, "GET", &format!("/api/products/{}", id), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["sku"], "WDG-1");
    assert_eq!(body["data"]["needs_restock"], true); // 5 <= 5
    assert_eq!(body["data"]["stock_value"], 49.95);
}

#[tokio::test]
async fn duplicate_sku_conflicts_case_insensitively() {
    let router = app();
    create(&router, widget_payload("WDG-1")).await;

    let (status, body) = send(
        &router,
        "POST",
        "/api/products",
        Some(widget_payload("wdg-1")),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn create_validation_reports_field_errors() {
    let router = app();
    let (status, body) = send(
        &router,
        "POST",
        "/api/products",
        Some(json!({
            "name": "x",
            "sku": "bad sku!",
            "price": -1.0
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let errors = body["errors"].as_array().unwrap();
    let fields: Vec<&str> = errors.iter().map(|e| e["field"].as_str().unwrap()).collect();
    assert!(fields.contains(&"name"));
    assert!(fields.contains(&"sku"));
    assert!(fields.contains(&"price"));
}

#[tokio::test]
async fn stock_subtract_checks_available_quantity() {
    let router = app();
    let created = create(&router, widget_payload("WDG-1")).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/products/{}/stock", id);

    // Subtracting more than available fails and leaves stock unchanged
    let (status, body) = send(
        &router,
        "PATCH",
        &uri,
        Some(json!({"quantity": 9, "operation": "subtract"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["data"]["available"], 5);
    assert_eq!(body["data"]["requested"], 9);

    let (_, body) = send(&router, "GET", &format!("/api/products/{}", id), None).await;
    assert_eq!(body["data"]["stock"], 5);

    // Add always succeeds for positive quantity
    let (status, body) = send(
        &router,
        "PATCH",
        &uri,
        Some(json!({"quantity": 7, "operation": "add", "reason": "restock"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["stock"], 12);
    assert_eq!(body["data"]["movement"]["previous_stock"], 5);
    assert_eq!(body["data"]["movement"]["current_stock"], 12);
    assert_eq!(body["data"]["movement"]["operation"], "add");
    assert_eq!(body["data"]["movement"]["reason"], "restock");

    // Now subtract within bounds
    let (status, body) = send(
        &router,
        "PATCH",
        &uri,
        Some(json!({"quantity": 2, "operation": "subtract"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["product"]["stock"], 10);
}

#[tokio::test]
async fn stock_add_rejects_quantity_that_overflows() {
    let router = app();
    let created = create(&router, widget_payload("WDG-1")).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        "PATCH",
        &format!("/api/products/{}/stock", id),
        Some(json!({"quantity": i64::MAX, "operation": "add"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["success"], false);

    // Stock is untouched by the failed mutation
    let (_, body) = send(&router, "GET", &format!("/api/products/{}", id), None).await;
    assert_eq!(body["data"]["stock"], 5);
}

#[tokio::test]
async fn stock_quantity_must_be_positive() {
    let router = app();
    let created = create(&router, widget_payload("WDG-1")).await;
    let id = created["id"].as_str().unwrap();

    let (status, body) = send(
        &router,
        "PATCH",
        &format!("/api/products/{}/stock", id),
        Some(json!({"quantity": 0, "operation": "add"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["errors"][0]["field"], "quantity");
}

#[tokio::test]
async fn pagination_metadata_is_exact() {
    let router = app();
    for i in 0..25 {
        create(
            &router,
            json!({
                "name": format!("Product {i}"),
                "sku": format!("P-{i}"),
                "price": 1.0,
                "stock": 50
            }),
        )
        .await;
    }

    let (status, body) = send(&router, "GET", "/api/products?page=3&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 5);

    let pagination = &body["meta"]["pagination"];
    assert_eq!(pagination["current_page"], 3);
    assert_eq!(pagination["per_page"], 10);
    assert_eq!(pagination["total_items"], 25);
    assert_eq!(pagination["total_pages"], 3);
    assert_eq!(pagination["has_next_page"], false);
    assert_eq!(pagination["has_prev_page"], true);
    assert_eq!(pagination["prev_page"], 2);

    // Page beyond range is empty but still well-formed
    let (status, body) = send(&router, "GET", "/api/products?page=9&limit=10", None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"].as_array().unwrap().is_empty());
    assert_eq!(body["meta"]["pagination"]["total_pages"], 3);
}

#[tokio::test]
async fn delete_restore_round_trip() {
    let router = app();
    let created = create(&router, widget_payload("WDG-1")).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/products/{}", id);

    let (status, _) = send(&router, "DELETE", &uri, None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // The SKU is freed while the record is deleted
    let successor = create(&router, widget_payload("WDG-1")).await;

    // Restoring while a live record holds the SKU would break uniqueness
    let (status, _) = send(
        &router,
        "POST",
        &format!("/api/products/{}/restore", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);

    let successor_id = successor["id"].as_str().unwrap();
    let (status, _) = send(
        &router,
        "DELETE",
        &format!("/api/products/{}", successor_id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send(
        &router,
        "POST",
        &format!("/api/products/{}/restore", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert!(body["data"]["deleted_at"].is_null());

    let (status, _) = send(&router, "GET", &uri, None).await;
    assert_eq!(status, StatusCode::OK);

    // Restoring a live record is a 400, not a 404
    let (status, _) = send(
        &router,
        "POST",
        &format!("/api/products/{}/restore", id),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_filters_combine_as_and_groups() {
    let router = app();
    create(
        &router,
        json!({"name": "Scarce Widget", "sku": "SW-1", "price": 5.0, "stock": 2}),
    )
    .await;
    create(
        &router,
        json!({"name": "Scarce Gadget", "sku": "SG-1", "price": 5.0, "stock": 2}),
    )
    .await;
    create(
        &router,
        json!({"name": "Plenty Widget", "sku": "PW-1", "price": 5.0, "stock": 80}),
    )
    .await;

    // search AND low_stock: only the scarce widget qualifies
    let (status, body) = send(
        &router,
        "GET",
        "/api/products?search=widget&low_stock=true",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let items = body["data"].as_array().unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["sku"], "SW-1");
}

#[tokio::test]
async fn low_stock_listing_includes_records_at_threshold() {
    let router = app();
    create(&router, widget_payload("WDG-1")).await; // stock 5, min_stock 5

    let (status, body) = send(
        &router,
        "GET",
        "/api/products?low_stock=true&limit=10",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn list_include_stats_adds_aggregates() {
    let router = app();
    create(
        &router,
        json!({"name": "Widget", "sku": "W-1", "price": 10.0, "stock": 3, "category": "Tools"}),
    )
    .await;
    create(
        &router,
        json!({"name": "Gadget", "sku": "G-1", "price": 2.0, "stock": 0, "category": "Toys"}),
    )
    .await;

    let (status, body) = send(&router, "GET", "/api/products?include_stats=true", None).await;
    assert_eq!(status, StatusCode::OK);
    let stats = &body["meta"]["stats"];
    assert_eq!(stats["total_products"], 2);
    assert_eq!(stats["total_value"], 30.0);
    assert_eq!(stats["out_of_stock_count"], 1);
    assert_eq!(stats["categories"], 2);
}

#[tokio::test]
async fn sort_order_is_validated_with_fallback() {
    let router = app();
    create(
        &router,
        json!({"name": "Alpha", "sku": "A-1", "price": 1.0, "stock": 50}),
    )
    .await;
    create(
        &router,
        json!({"name": "Beta", "sku": "B-1", "price": 2.0, "stock": 50}),
    )
    .await;

    let (_, body) = send(
        &router,
        "GET",
        "/api/products?sort_by=name&sort_order=AsC",
        None,
    )
    .await;
    let items = body["data"].as_array().unwrap();
    assert_eq!(items[0]["name"], "Alpha");

    // Unknown sort field falls back without an error
    let (status, _) = send(
        &router,
        "GET",
        "/api/products?sort_by=secret_column",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn patch_rejects_empty_body_and_updates_fields() {
    let router = app();
    let created = create(&router, widget_payload("WDG-1")).await;
    let id = created["id"].as_str().unwrap();
    let uri = format!("/api/products/{}", id);

    let (status, _) = send(&router, "PATCH", &uri, Some(json!({}))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        "PATCH",
        &uri,
        Some(json!({"price": 19.99, "category": "Tools"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["price"], 19.99);
    assert_eq!(body["data"]["category"], "Tools");
    // Untouched fields survive
    assert_eq!(body["data"]["sku"], "WDG-1");
}

#[tokio::test]
async fn replace_updates_and_checks_sku_conflicts() {
    let router = app();
    create(&router, widget_payload("WDG-1")).await;
    let other = create(&router, widget_payload("WDG-2")).await;
    let id = other["id"].as_str().unwrap();
    let uri = format!("/api/products/{}", id);

    // Full replace with its own SKU works
    let (status, body) = send(
        &router,
        "PUT",
        &uri,
        Some(json!({"name": "Widget II", "sku": "WDG-2", "price": 20.0, "stock": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["name"], "Widget II");

    // Taking another live record's SKU conflicts
    let (status, _) = send(
        &router,
        "PUT",
        &uri,
        Some(json!({"name": "Widget II", "sku": "wdg-1", "price": 20.0})),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn not_found_and_bad_id_are_distinct() {
    let router = app();

    let (status, _) = send(
        &router,
        "GET",
        "/api/products/f47ac10b-58cc-4372-a567-0e02b2c3d479",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&router, "GET", "/api/products/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn search_endpoint_enforces_minimum_length_and_cap() {
    let router = app();
    for i in 0..30 {
        create(
            &router,
            json!({
                "name": format!("Widget {i}"),
                "sku": format!("W-{i}"),
                "price": 1.0,
                "stock": 50
            }),
        )
        .await;
    }

    let (status, _) = send(&router, "GET", "/api/products/search?search=w", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = send(
        &router,
        "GET",
        "/api/products/search?search=widget",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"].as_array().unwrap().len(), 20);
}

#[tokio::test]
async fn stats_endpoint_reports_breakdown() {
    let router = app();
    create(
        &router,
        json!({"name": "Widget", "sku": "W-1", "price": 10.0, "stock": 2, "category": "Tools", "brand": "Acme"}),
    )
    .await;
    create(
        &router,
        json!({"name": "Gadget", "sku": "G-1", "price": 1.0, "stock": 0}),
    )
    .await;

    let (status, body) = send(&router, "GET", "/api/products/stats", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["stats"]["total_products"], 2);
    assert_eq!(body["data"]["stats"]["brands"], 1);

    let by_category = body["data"]["by_category"].as_array().unwrap();
    assert_eq!(by_category.len(), 2);
    assert!(by_category
        .iter()
        .any(|b| b["category"] == "uncategorized"));
}

#[tokio::test]
async fn high_value_report_orders_by_stock_value() {
    let router = app();
    create(
        &router,
        json!({"name": "Bulk", "sku": "B-1", "price": 2.0, "stock": 600}),
    )
    .await;
    create(
        &router,
        json!({"name": "Premium", "sku": "P-1", "price": 50.0, "stock": 100}),
    )
    .await;
    create(
        &router,
        json!({"name": "Cheap", "sku": "C-1", "price": 1.0, "stock": 100}),
    )
    .await;

    let (status, body) = send(
        &router,
        "GET",
        "/api/products/reports/high_value",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let report = &body["data"];
    assert_eq!(report["count"], 2);
    assert_eq!(report["items"][0]["name"], "Premium");
    assert_eq!(report["items"][1]["name"], "Bulk");

    let (status, _) = send(&router, "GET", "/api/products/reports/weekly", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn report_types_cover_all_views() {
    let router = app();
    create(
        &router,
        json!({"name": "Empty", "sku": "E-1", "price": 1.0, "stock": 0}),
    )
    .await;
    create(
        &router,
        json!({"name": "Full", "sku": "F-1", "price": 1.0, "stock": 99}),
    )
    .await;

    for (report_type, expected_count) in [
        ("inventory", 2),
        ("low_stock", 1),
        ("out_of_stock", 1),
    ] {
        let (status, body) = send(
            &router,
            "GET",
            &format!("/api/products/reports/{}", report_type),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK, "report {}", report_type);
        assert_eq!(body["data"]["count"], expected_count, "report {}", report_type);
        assert!(body["data"]["title"].as_str().unwrap().contains("Report"));
    }
}

#[tokio::test]
async fn health_endpoint_reports_status() {
    let router = app();
    let (status, body) = send(&router, "GET", "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));
    assert!(body["uptime_seconds"].is_u64());
}
