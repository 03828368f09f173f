use std::sync::Arc;

use chrono::{DateTime, Utc};
use logi_catalog::inventory::{self, InventoryError};
use logi_order::{NewOrder, Order, OrderDraft};
use logi_shared::models::LogisticsEvent;
use logi_shared::{OrderId, ProductId, ShipmentId, SupplierId};
use tracing::{info, warn};

use crate::events::EventPublisher;
use crate::repository::{CancelOutcome, Repositories};
use crate::{CoreError, CoreResult};

/// Order placement and cancellation, with the stock bookkeeping they imply.
pub struct OrderService {
    repos: Repositories,
    events: Arc<dyn EventPublisher>,
}

impl OrderService {
    pub fn new(repos: Repositories, events: Arc<dyn EventPublisher>) -> Self {
        Self { repos, events }
    }

    /// Places an order: checks stock, fixes the order volume from the
    /// product's unit volume and reserves the quantity.
    pub async fn place_order(&self, new_order: NewOrder) -> CoreResult<Order> {
        if new_order.quantity_ordered <= 0 {
            return Err(InventoryError::InvalidQuantity(new_order.quantity_ordered).into());
        }

        let product = self
            .repos
            .products
            .get_product(new_order.product_id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product"))?;

        if self.repos.suppliers.get_supplier(new_order.supplier_id).await?.is_none() {
            return Err(CoreError::not_found("Supplier"));
        }

        let insufficient = InventoryError::InsufficientStock {
            requested: new_order.quantity_ordered,
            available: product.quantity_available,
        };
        if !inventory::has_stock(&product, new_order.quantity_ordered) {
            warn!(product_id = product.product_id, "{}", insufficient);
            return Err(insufficient.into());
        }

        let draft = OrderDraft {
            product_id: product.product_id,
            supplier_id: new_order.supplier_id,
            order_date: new_order.order_date.unwrap_or_else(Utc::now),
            quantity_ordered: new_order.quantity_ordered,
            total_volume: inventory::order_volume(&product, new_order.quantity_ordered),
        };

        let order = match self.repos.orders.place_order(draft).await? {
            Some(order) => order,
            None => {
                warn!(product_id = product.product_id, "Stock taken before order could be placed");
                return Err(insufficient.into());
            }
        };

        info!(
            order_id = order.order_id,
            product_id = order.product_id,
            supplier_id = order.supplier_id,
            quantity = order.quantity_ordered,
            "Order placed"
        );
        self.events.publish(LogisticsEvent::OrderPlaced {
            order_id: order.order_id,
            product_id: order.product_id,
            supplier_id: order.supplier_id,
            quantity_ordered: order.quantity_ordered,
            timestamp: Utc::now().timestamp(),
        });

        Ok(order)
    }

    /// Cancels an order by deleting it and restoring its stock. Orders whose
    /// shipment was delivered stay.
    pub async fn cancel_order(&self, id: OrderId) -> CoreResult<Order> {
        let order = match self.repos.orders.cancel_order(id).await? {
            CancelOutcome::Cancelled(order) => order,
            CancelOutcome::Delivered => {
                return Err(CoreError::ValidationError(
                    "Cannot cancel order that has been delivered".to_string(),
                ))
            }
            CancelOutcome::NotFound => return Err(CoreError::not_found("Order")),
        };

        info!(order_id = id, quantity = order.quantity_ordered, "Order cancelled, stock restored");
        self.events.publish(LogisticsEvent::OrderCancelled {
            order_id: order.order_id,
            product_id: order.product_id,
            quantity_restored: order.quantity_ordered,
            timestamp: Utc::now().timestamp(),
        });

        Ok(order)
    }

    pub async fn get_order(&self, id: OrderId) -> CoreResult<Order> {
        self.repos
            .orders
            .get_order(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Order"))
    }

    pub async fn list_orders(&self) -> CoreResult<Vec<Order>> {
        Ok(self.repos.orders.list_orders().await?)
    }

    pub async fn orders_between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> CoreResult<Vec<Order>> {
        if start > end {
            return Err(CoreError::ValidationError(
                "start_date must not be after end_date".to_string(),
            ));
        }
        Ok(self.repos.orders.list_orders_between(start, end).await?)
    }

    pub async fn orders_for_product(&self, product_id: ProductId) -> CoreResult<Vec<Order>> {
        Ok(self.repos.orders.list_orders_for_product(product_id).await?)
    }

    pub async fn orders_for_supplier(&self, supplier_id: SupplierId) -> CoreResult<Vec<Order>> {
        Ok(self.repos.orders.list_orders_for_supplier(supplier_id).await?)
    }

    /// Orders consolidated into a shipment.
    pub async fn orders_for_shipment(&self, shipment_id: ShipmentId) -> CoreResult<Vec<Order>> {
        if self.repos.shipments.get_shipment(shipment_id).await?.is_none() {
            return Err(CoreError::not_found("Shipment"));
        }
        Ok(self.repos.orders.list_orders_for_shipment(shipment_id).await?)
    }
}
