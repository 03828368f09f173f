use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::Router;
use logi_api::{app, AppState};
use logi_shared::models::LogisticsEvent;
use logi_store::app_config::BusinessRules;
use logi_store::{EventBroadcaster, MemoryStore};
use serde_json::{json, Value};
use tower::ServiceExt;

fn test_state() -> AppState {
    AppState::new(
        MemoryStore::new().repositories(),
        BusinessRules::default(),
        EventBroadcaster::new(16),
    )
}

async fn send(app: &Router, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(match body {
            Some(json) => Body::from(json.to_string()),
            None => Body::empty(),
        })
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let json = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, json)
}

async fn create_supplier(app: &Router, min_capacity: f64) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/suppliers",
        Some(json!({
            "name": "Northwind",
            "address": "9 Harbour St",
            "contact_person": "Dana",
            "phone_number": "555-0100",
            "min_capacity": min_capacity
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["supplier_id"].as_i64().unwrap()
}

async fn create_product(app: &Router, quantity: i32) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/products",
        Some(json!({
            "name": "Pallet",
            "description": "Euro pallet",
            "unit_price": 12.0,
            "quantity_available": quantity,
            "unit_volume": 5.0
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["product_id"].as_i64().unwrap()
}

async fn place_order(app: &Router, product_id: i64, supplier_id: i64, quantity: i32) -> i64 {
    let (status, body) = send(
        app,
        "POST",
        "/orders",
        Some(json!({
            "product_id": product_id,
            "supplier_id": supplier_id,
            "order_date": "2024-03-01T08:00:00Z",
            "quantity_ordered": quantity
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["order_id"].as_i64().unwrap()
}

fn shipment_request(order_ids: &[i64], priority: &str) -> Value {
    json!({
        "order_ids": order_ids,
        "shipment_date": "2024-03-01T08:00:00Z",
        "estimated_arrival_date": "2024-03-04T08:00:00Z",
        "status": "Pending",
        "priority": priority
    })
}

/// Supplier with capacity 50 and two orders of volume 20 and 15.
async fn two_order_setup(app: &Router) -> (i64, i64, i64) {
    let supplier_id = create_supplier(app, 50.0).await;
    let product_id = create_product(app, 100).await;
    let a = place_order(app, product_id, supplier_id, 4).await;
    let b = place_order(app, product_id, supplier_id, 3).await;
    (supplier_id, a, b)
}

#[tokio::test]
async fn test_root_is_alive_and_tagged_with_request_id() {
    let app = app(test_state());

    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_urgent_shipment_below_capacity_is_surcharged() {
    let app = app(test_state());
    let (_, a, b) = two_order_setup(&app).await;

    let (status, shipment) = send(&app, "POST", "/shipments", Some(shipment_request(&[a, b], "urgent"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(shipment["current_load"], json!(35.0));
    assert_eq!(shipment["required_capacity"], json!(50.0));
    assert_eq!(shipment["extra_charge"], json!(150.0));
    assert_eq!(shipment["total_cost"], json!(150.0));
    assert_eq!(shipment["cost_reason"], json!("Urgent dispatch below capacity"));
    assert_eq!(shipment["status"], json!("Pending"));
    assert_eq!(shipment["priority"], json!("urgent"));
    assert_eq!(shipment["order_id"], json!(a));

    let id = shipment["shipment_id"].as_i64().unwrap();
    let (status, orders) = send(&app, "GET", &format!("/shipments/{id}/orders"), None).await;
    assert_eq!(status, StatusCode::OK);
    let orders = orders.as_array().unwrap();
    assert_eq!(orders.len(), 2);
    for order in orders {
        assert_eq!(order["status"], json!("Scheduled"));
        assert_eq!(order["shipment_id"], json!(id));
    }
}

#[tokio::test]
async fn test_normal_shipment_below_capacity_waits() {
    let app = app(test_state());
    let (_, a, b) = two_order_setup(&app).await;

    let (status, shipment) = send(&app, "POST", "/shipments", Some(shipment_request(&[a, b], "normal"))).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(shipment["status"], json!("Waiting"));
    assert_eq!(shipment["extra_charge"], json!(0.0));
    assert_eq!(shipment["cost_reason"], Value::Null);

    let (_, order) = send(&app, "GET", &format!("/orders/{b}"), None).await;
    assert_eq!(order["status"], json!("Waiting"));
}

#[tokio::test]
async fn test_normal_pending_shipment_at_capacity_is_planned() {
    let app = app(test_state());
    let supplier_id = create_supplier(&app, 20.0).await;
    let product_id = create_product(&app, 100).await;
    let a = place_order(&app, product_id, supplier_id, 4).await;

    let (status, shipment) = send(
        &app,
        "POST",
        "/shipments",
        Some(json!({
            "order_id": a,
            "shipment_date": "2024-03-01T08:00:00Z",
            "estimated_arrival_date": "2024-03-04T08:00:00Z",
            "status": "Pending"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(shipment["status"], json!("Planning"));
    assert_eq!(shipment["load_percentage"], json!(100.0));
    assert_eq!(shipment["priority"], json!("normal"));
}

#[tokio::test]
async fn test_unresolvable_and_mixed_requests_are_rejected() {
    let app = app(test_state());
    let (_, a, _) = two_order_setup(&app).await;
    let other_supplier = create_supplier(&app, 10.0).await;
    let product_id = create_product(&app, 10).await;
    let foreign = place_order(&app, product_id, other_supplier, 1).await;

    let (status, body) = send(&app, "POST", "/shipments", Some(shipment_request(&[998, 999], "normal"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, _) = send(&app, "POST", "/shipments", Some(shipment_request(&[], "normal"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(&app, "POST", "/shipments", Some(shipment_request(&[a, foreign], "urgent"))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, shipments) = send(&app, "GET", "/shipments", None).await;
    assert_eq!(shipments, json!([]));
}

#[tokio::test]
async fn test_consolidated_order_cannot_be_claimed_again() {
    let app = app(test_state());
    let (_, a, b) = two_order_setup(&app).await;

    let (status, _) = send(&app, "POST", "/shipments", Some(shipment_request(&[a], "urgent"))).await;
    assert_eq!(status, StatusCode::OK);

    let (status, body) = send(&app, "POST", "/shipments", Some(shipment_request(&[a, b], "urgent"))).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert!(body["error"].as_str().unwrap().contains("already assigned"));

    let (_, order) = send(&app, "GET", &format!("/orders/{b}"), None).await;
    assert_eq!(order["shipment_id"], Value::Null);
}

#[tokio::test]
async fn test_order_placement_reserves_and_cancellation_restores_stock() {
    let app = app(test_state());
    let supplier_id = create_supplier(&app, 10.0).await;
    let product_id = create_product(&app, 6).await;

    let order_id = place_order(&app, product_id, supplier_id, 4).await;
    let (_, product) = send(&app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(product["quantity_available"], json!(2));

    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({ "product_id": product_id, "supplier_id": supplier_id, "quantity_ordered": 3 })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("Insufficient stock available"));

    let (status, _) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({ "product_id": 404, "supplier_id": supplier_id, "quantity_ordered": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, "DELETE", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    let (_, product) = send(&app, "GET", &format!("/products/{product_id}"), None).await;
    assert_eq!(product["quantity_available"], json!(6));

    let (status, _) = send(&app, "DELETE", &format!("/orders/{order_id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delivered_order_cannot_be_cancelled() {
    let app = app(test_state());
    let (_, a, _) = two_order_setup(&app).await;
    let (_, shipment) = send(&app, "POST", "/shipments", Some(shipment_request(&[a], "urgent"))).await;
    let id = shipment["shipment_id"].as_i64().unwrap();

    let (status, updated) = send(
        &app,
        "PUT",
        &format!("/shipments/{id}"),
        Some(json!({ "status": "Delivered" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["extra_charge"], shipment["extra_charge"]);

    let (status, body) = send(&app, "DELETE", &format!("/orders/{a}"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], json!("Validation failed: Cannot cancel order that has been delivered"));
}

#[tokio::test]
async fn test_shipment_update_refuses_cost_fields() {
    let app = app(test_state());
    let (_, a, _) = two_order_setup(&app).await;
    let (_, shipment) = send(&app, "POST", "/shipments", Some(shipment_request(&[a], "urgent"))).await;
    let id = shipment["shipment_id"].as_i64().unwrap();

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/shipments/{id}"),
        Some(json!({ "extra_charge": 0.0 })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].as_str().unwrap().contains("extra_charge"));
    let (_, stored) = send(&app, "GET", &format!("/shipments/{id}"), None).await;
    assert_eq!(stored["extra_charge"], json!(300.0));
    assert_eq!(stored["extra_charge"], shipment["extra_charge"]);
}

#[tokio::test]
async fn test_malformed_query_and_path_answer_json_errors() {
    let app = app(test_state());
    let product_id = create_product(&app, 10).await;

    let (status, body) = send(
        &app,
        "PUT",
        &format!("/products/{product_id}/adjust-stock?amount=lots"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(&app, "GET", "/orders/first", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].is_string());

    let (status, body) = send(
        &app,
        "POST",
        "/orders",
        Some(json!({ "product_id": "one", "supplier_id": 1, "quantity_ordered": 1 })),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_arrival_tracking() {
    let app = app(test_state());
    let (_, a, b) = two_order_setup(&app).await;
    let (_, early) = send(&app, "POST", "/shipments", Some(shipment_request(&[a], "urgent"))).await;
    let (_, late) = send(&app, "POST", "/shipments", Some(shipment_request(&[b], "urgent"))).await;
    let early = early["shipment_id"].as_i64().unwrap();
    let late = late["shipment_id"].as_i64().unwrap();

    let (status, _) = send(
        &app,
        "PUT",
        &format!("/shipments/{early}/arrival?actual_arrival_date=2024-03-03T08:00:00Z"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    send(
        &app,
        "PUT",
        &format!("/shipments/{late}/arrival?actual_arrival_date=2024-03-06T08:00:00Z"),
        None,
    )
    .await;

    let (_, on_time) = send(&app, "GET", "/shipments/on-time", None).await;
    let (_, delayed) = send(&app, "GET", "/shipments/delayed", None).await;
    assert_eq!(on_time.as_array().unwrap().len(), 1);
    assert_eq!(on_time[0]["shipment_id"], json!(early));
    assert_eq!(delayed.as_array().unwrap().len(), 1);
    assert_eq!(delayed[0]["shipment_id"], json!(late));

    let (_, for_order) = send(&app, "GET", &format!("/shipments/order/{b}"), None).await;
    assert_eq!(for_order[0]["shipment_id"], json!(late));
}

#[tokio::test]
async fn test_supplier_lifecycle() {
    let app = app(test_state());
    let (supplier_id, _, _) = two_order_setup(&app).await;

    let (status, supplier) = send(
        &app,
        "PUT",
        &format!("/suppliers/{supplier_id}"),
        Some(json!({ "min_capacity": 40.0 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(supplier["min_capacity"], json!(40.0));
    assert_eq!(supplier["name"], json!("Northwind"));

    let (status, _) = send(&app, "DELETE", &format!("/suppliers/{supplier_id}"), None).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (_, orders) = send(&app, "GET", &format!("/suppliers/{supplier_id}/orders"), None).await;
    assert_eq!(orders.as_array().unwrap().len(), 2);

    let empty = create_supplier(&app, 0.0).await;
    let (status, _) = send(&app, "DELETE", &format!("/suppliers/{empty}"), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) = send(&app, "GET", &format!("/suppliers/{empty}/shipments"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_stock_adjustment_and_low_stock() {
    let app = app(test_state());
    let product_id = create_product(&app, 12).await;

    let (status, product) = send(&app, "PUT", &format!("/products/{product_id}/adjust-stock?amount=-5"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["quantity_available"], json!(7));

    let (status, _) = send(&app, "PUT", &format!("/products/{product_id}/adjust-stock?amount=-8"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, low) = send(&app, "GET", "/products/low-stock", None).await;
    assert_eq!(low.as_array().unwrap().len(), 1);
    let (_, low) = send(&app, "GET", "/products/low-stock?threshold=5", None).await;
    assert_eq!(low, json!([]));
}

#[tokio::test]
async fn test_dashboard_summary_and_event_feed() {
    let state = test_state();
    let mut rx = state.events.subscribe();
    let app = app(state);
    let (_, a, b) = two_order_setup(&app).await;
    send(&app, "POST", "/shipments", Some(shipment_request(&[a, b], "normal"))).await;

    let (status, summary) = send(&app, "GET", "/dashboard/summary", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(summary["suppliers"], json!(1));
    assert_eq!(summary["orders"], json!(2));
    assert_eq!(summary["shipments"], json!(1));
    assert_eq!(summary["active_shipments"], json!(1));
    assert_eq!(summary["low_stock_products"], json!(0));

    assert!(matches!(rx.recv().await.unwrap(), LogisticsEvent::OrderPlaced { .. }));
    assert!(matches!(rx.recv().await.unwrap(), LogisticsEvent::OrderPlaced { .. }));
    match rx.recv().await.unwrap() {
        LogisticsEvent::ShipmentConsolidated { order_ids, status, .. } => {
            assert_eq!(order_ids, vec![a, b]);
            assert_eq!(status, "Waiting");
        }
        other => panic!("unexpected event {:?}", other),
    }
}

#[tokio::test]
async fn test_orders_by_date_range() {
    let app = app(test_state());
    let (_, a, _) = two_order_setup(&app).await;

    let (status, orders) = send(
        &app,
        "GET",
        "/orders/date-range?start_date=2024-03-01T00:00:00Z&end_date=2024-03-01T08:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(orders.as_array().unwrap().len(), 2);
    assert_eq!(orders[0]["order_id"], json!(a));
    assert_eq!(orders[0]["total_volume"], json!(20.0));

    let (status, _) = send(
        &app,
        "GET",
        "/orders/date-range?start_date=2024-03-02T00:00:00Z&end_date=2024-03-01T00:00:00Z",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
