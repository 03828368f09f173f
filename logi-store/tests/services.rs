use std::sync::Arc;

use chrono::{TimeZone, Utc};
use logi_catalog::{NewProduct, NewSupplier, ProductUpdate, SupplierUpdate};
use logi_core::{CatalogService, CoreError, NoopPublisher, OrderService, ShipmentService};
use logi_order::{
    ConsolidationPlanner, ConsolidationRequest, NewOrder, Order, OrderStatus, Priority,
    ShipmentUpdate,
};
use logi_store::MemoryStore;

struct Harness {
    catalog: CatalogService,
    orders: OrderService,
    shipments: ShipmentService,
}

fn harness() -> Harness {
    let repos = MemoryStore::new().repositories();
    let events = Arc::new(NoopPublisher);
    Harness {
        catalog: CatalogService::new(repos.clone(), 10),
        orders: OrderService::new(repos.clone(), events.clone()),
        shipments: ShipmentService::new(repos.shipments.clone(), ConsolidationPlanner::default(), events),
    }
}

async fn supplier(h: &Harness, min_capacity: f64) -> i64 {
    h.catalog
        .create_supplier(NewSupplier {
            name: "Northwind".to_string(),
            address: "9 Harbour St".to_string(),
            contact_person: Some("Dana".to_string()),
            phone_number: Some("555-0100".to_string().into()),
            min_capacity: Some(min_capacity),
        })
        .await
        .unwrap()
        .supplier_id
}

async fn product(h: &Harness, quantity: i32) -> i64 {
    h.catalog
        .create_product(NewProduct {
            name: "Pallet".to_string(),
            description: None,
            unit_price: 12.0,
            quantity_available: quantity,
            unit_volume: Some(5.0),
        })
        .await
        .unwrap()
        .product_id
}

async fn order(h: &Harness, product_id: i64, supplier_id: i64, quantity: i32) -> Order {
    h.orders
        .place_order(NewOrder {
            product_id,
            supplier_id,
            order_date: None,
            quantity_ordered: quantity,
        })
        .await
        .unwrap()
}

fn request(order_ids: Vec<i64>, priority: Priority) -> ConsolidationRequest {
    ConsolidationRequest {
        order_id: None,
        order_ids: Some(order_ids),
        shipment_date: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
        estimated_arrival_date: Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
        status: "Pending".to_string(),
        priority,
        actual_arrival_date: None,
    }
}

#[tokio::test]
async fn test_urgent_consolidation_below_capacity_is_surcharged() {
    let h = harness();
    let supplier_id = supplier(&h, 50.0).await;
    let product_id = product(&h, 100).await;
    let a = order(&h, product_id, supplier_id, 4).await;
    let b = order(&h, product_id, supplier_id, 3).await;

    let result = h
        .shipments
        .create_shipment(&request(vec![a.order_id, b.order_id], Priority::Urgent))
        .await
        .unwrap();

    assert_eq!(result.shipment.current_load, 35.0);
    assert_eq!(result.shipment.extra_charge, 150.0);
    assert_eq!(result.shipment.status, "Pending");
    assert_eq!(result.shipment.cost_reason.as_deref(), Some("Urgent dispatch below capacity"));

    let linked = h.orders.orders_for_shipment(result.shipment.shipment_id).await.unwrap();
    assert_eq!(linked.len(), 2);
    assert!(linked.iter().all(|o| o.status == OrderStatus::Scheduled));
}

#[tokio::test]
async fn test_normal_consolidation_below_capacity_waits() {
    let h = harness();
    let supplier_id = supplier(&h, 50.0).await;
    let product_id = product(&h, 100).await;
    let a = order(&h, product_id, supplier_id, 4).await;
    let b = order(&h, product_id, supplier_id, 3).await;

    let result = h
        .shipments
        .create_shipment(&request(vec![b.order_id, a.order_id], Priority::Normal))
        .await
        .unwrap();

    assert_eq!(result.shipment.status, "Waiting");
    assert_eq!(result.shipment.extra_charge, 0.0);
    assert_eq!(result.shipment.order_id, Some(a.order_id));
    let stored = h.orders.get_order(b.order_id).await.unwrap();
    assert_eq!(stored.status, OrderStatus::Waiting);
    assert_eq!(stored.shipment_id, Some(result.shipment.shipment_id));
}

#[tokio::test]
async fn test_supplier_without_threshold_plans_at_zero_capacity() {
    let h = harness();
    let supplier_id = h
        .catalog
        .create_supplier(NewSupplier {
            name: "Blue Line".to_string(),
            address: "3 Quay Ln".to_string(),
            contact_person: None,
            phone_number: None,
            min_capacity: None,
        })
        .await
        .unwrap()
        .supplier_id;
    let product_id = product(&h, 100).await;
    let a = order(&h, product_id, supplier_id, 2).await;

    let result = h
        .shipments
        .create_shipment(&request(vec![a.order_id], Priority::Normal))
        .await
        .unwrap();

    assert_eq!(result.shipment.required_capacity, 0.0);
    assert_eq!(result.shipment.status, "Planning");
    assert_eq!(result.shipment.extra_charge, 0.0);
}

#[tokio::test]
async fn test_order_cannot_join_two_shipments() {
    let h = harness();
    let supplier_id = supplier(&h, 10.0).await;
    let product_id = product(&h, 100).await;
    let a = order(&h, product_id, supplier_id, 4).await;

    h.shipments
        .create_shipment(&request(vec![a.order_id], Priority::Normal))
        .await
        .unwrap();
    let second = h
        .shipments
        .create_shipment(&request(vec![a.order_id], Priority::Normal))
        .await;

    assert!(matches!(second, Err(CoreError::Conflict(_))));
    assert_eq!(h.catalog.supplier_shipments(supplier_id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_mixed_suppliers_are_rejected_without_writes() {
    let h = harness();
    let first = supplier(&h, 10.0).await;
    let second = supplier(&h, 10.0).await;
    let product_id = product(&h, 100).await;
    let a = order(&h, product_id, first, 2).await;
    let b = order(&h, product_id, second, 2).await;

    let result = h
        .shipments
        .create_shipment(&request(vec![a.order_id, b.order_id], Priority::Normal))
        .await;

    assert!(matches!(result, Err(CoreError::Consolidation(_))));
    assert!(h.catalog.supplier_shipments(first).await.unwrap().is_empty());
    assert_eq!(h.orders.get_order(a.order_id).await.unwrap().shipment_id, None);
}

#[tokio::test]
async fn test_order_placement_checks_stock() {
    let h = harness();
    let supplier_id = supplier(&h, 10.0).await;
    let product_id = product(&h, 5).await;

    let placed = order(&h, product_id, supplier_id, 5).await;
    assert_eq!(placed.total_volume, Some(25.0));
    assert_eq!(h.catalog.get_product(product_id).await.unwrap().quantity_available, 0);

    let refused = h
        .orders
        .place_order(NewOrder {
            product_id,
            supplier_id,
            order_date: None,
            quantity_ordered: 1,
        })
        .await;
    assert!(matches!(refused, Err(CoreError::Inventory(_))));
    assert_eq!(h.catalog.low_stock(None).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_stock_adjustment_keeps_order_reservations() {
    let h = harness();
    let supplier_id = supplier(&h, 10.0).await;
    let product_id = product(&h, 20).await;
    order(&h, product_id, supplier_id, 8).await;

    let adjusted = h.catalog.adjust_stock(product_id, 5).await.unwrap();
    assert_eq!(adjusted.quantity_available, 17);

    let renamed = h
        .catalog
        .update_product(
            product_id,
            ProductUpdate {
                name: Some("Euro pallet".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.quantity_available, 17);

    let refused = h.catalog.adjust_stock(product_id, -18).await;
    assert!(matches!(refused, Err(CoreError::Inventory(_))));
    let missing = h.catalog.adjust_stock(999, 1).await;
    assert!(matches!(missing, Err(CoreError::NotFound(_))));

    let restocked = h
        .catalog
        .update_product(
            product_id,
            ProductUpdate {
                quantity_available: Some(40),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(restocked.quantity_available, 40);
    assert_eq!(h.catalog.get_product(product_id).await.unwrap().quantity_available, 40);
}

#[tokio::test]
async fn test_delivered_orders_cannot_be_cancelled() {
    let h = harness();
    let supplier_id = supplier(&h, 10.0).await;
    let product_id = product(&h, 100).await;
    let a = order(&h, product_id, supplier_id, 4).await;
    let b = order(&h, product_id, supplier_id, 6).await;

    let shipment = h
        .shipments
        .create_shipment(&request(vec![a.order_id], Priority::Normal))
        .await
        .unwrap()
        .shipment;
    h.shipments
        .update_shipment(
            shipment.shipment_id,
            ShipmentUpdate {
                status: Some("Delivered".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let refused = h.orders.cancel_order(a.order_id).await;
    assert!(matches!(refused, Err(CoreError::ValidationError(_))));

    h.orders.cancel_order(b.order_id).await.unwrap();
    assert_eq!(h.catalog.get_product(product_id).await.unwrap().quantity_available, 96);
}

#[tokio::test]
async fn test_supplier_with_orders_cannot_be_deleted() {
    let h = harness();
    let supplier_id = supplier(&h, 10.0).await;
    let product_id = product(&h, 100).await;
    order(&h, product_id, supplier_id, 1).await;

    let result = h.catalog.delete_supplier(supplier_id).await;
    assert!(matches!(result, Err(CoreError::Conflict(_))));

    let updated = h
        .catalog
        .update_supplier(
            supplier_id,
            SupplierUpdate {
                min_capacity: Some(75.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.min_capacity, Some(75.0));
    assert_eq!(updated.name, "Northwind");
}
