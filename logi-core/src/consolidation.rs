use std::sync::Arc;

use chrono::{DateTime, Utc};
use logi_order::{
    propagate, tracking, ConsolidationError, ConsolidationPlanner, ConsolidationRequest, Order,
    Shipment, ShipmentUpdate,
};
use logi_shared::models::LogisticsEvent;
use logi_shared::{OrderId, ShipmentId};
use tracing::{info, warn};

use crate::events::EventPublisher;
use crate::repository::ShipmentRepository;
use crate::{CoreError, CoreResult};

/// A committed consolidation: the new shipment and its orders as written.
#[derive(Debug, Clone)]
pub struct Consolidation {
    pub shipment: Shipment,
    pub orders: Vec<Order>,
}

/// Creates shipments from orders and handles their later updates.
pub struct ShipmentService {
    shipments: Arc<dyn ShipmentRepository>,
    planner: ConsolidationPlanner,
    events: Arc<dyn EventPublisher>,
}

impl ShipmentService {
    pub fn new(
        shipments: Arc<dyn ShipmentRepository>,
        planner: ConsolidationPlanner,
        events: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            shipments,
            planner,
            events,
        }
    }

    /// Resolves the requested orders, plans the shipment, stores it and
    /// links the orders, all inside one unit of work.
    ///
    /// Orders already linked to a shipment are refused: the first
    /// consolidation to lock an order owns it.
    #[tracing::instrument(skip(self, request), fields(priority = request.priority.as_str()))]
    pub async fn create_shipment(&self, request: &ConsolidationRequest) -> CoreResult<Consolidation> {
        let ids = request.requested_order_ids();
        if ids.is_empty() {
            warn!("Shipment request names no orders");
            return Err(ConsolidationError::NoValidOrders.into());
        }

        let mut unit = self.shipments.begin_consolidation().await?;

        let mut orders = unit.lock_orders(&ids).await?;
        let supplier_id = ConsolidationPlanner::reference_supplier(&orders).map_err(|e| {
            warn!(requested = ids.len(), resolved = orders.len(), "Rejected shipment request: {}", e);
            e
        })?;

        if let Some(taken) = orders.iter().find(|o| o.shipment_id.is_some()) {
            return Err(CoreError::Conflict(format!(
                "Order {} is already assigned to shipment {}",
                taken.order_id,
                taken.shipment_id.unwrap_or_default()
            )));
        }

        let required_capacity = unit
            .get_supplier(supplier_id)
            .await?
            .map_or(0.0, |supplier| supplier.min_capacity_or_zero());

        let draft = self.planner.plan(request, &orders, required_capacity)?;
        let shipment = unit.insert_shipment(draft).await?;

        propagate(&shipment, &mut orders);
        for order in &orders {
            let linked = unit
                .link_order(order.order_id, shipment.shipment_id, order.status)
                .await?;
            if !linked {
                // unit is dropped uncommitted, the shipment insert goes with it
                return Err(CoreError::StorageError(format!(
                    "Order {} disappeared while linking shipment",
                    order.order_id
                )));
            }
        }

        unit.commit().await?;

        info!(
            shipment_id = shipment.shipment_id,
            supplier_id,
            orders = orders.len(),
            status = %shipment.status,
            current_load = shipment.current_load,
            extra_charge = shipment.extra_charge,
            "Shipment consolidated"
        );

        self.events.publish(LogisticsEvent::ShipmentConsolidated {
            shipment_id: shipment.shipment_id,
            supplier_id,
            order_ids: orders.iter().map(|o| o.order_id).collect(),
            status: shipment.status.clone(),
            current_load: shipment.current_load,
            extra_charge: shipment.extra_charge,
            timestamp: Utc::now().timestamp(),
        });

        Ok(Consolidation { shipment, orders })
    }

    pub async fn get_shipment(&self, id: ShipmentId) -> CoreResult<Shipment> {
        self.shipments
            .get_shipment(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Shipment"))
    }

    pub async fn list_shipments(&self) -> CoreResult<Vec<Shipment>> {
        Ok(self.shipments.list_shipments().await?)
    }

    /// Shipments an order belongs to, through either its own link or a
    /// shipment's primary pointer.
    pub async fn shipments_for_order(&self, order_id: OrderId) -> CoreResult<Vec<Shipment>> {
        Ok(self.shipments.list_shipments_for_order(order_id).await?)
    }

    pub async fn update_shipment(&self, id: ShipmentId, update: ShipmentUpdate) -> CoreResult<Shipment> {
        let mut shipment = self.get_shipment(id).await?;
        let arrived_now = shipment.actual_arrival_date.is_none() && update.actual_arrival_date.is_some();

        update.apply(&mut shipment)?;
        self.store(&shipment).await?;

        info!(shipment_id = id, status = %shipment.status, "Shipment updated");
        if arrived_now {
            self.publish_arrival(&shipment);
        }
        Ok(shipment)
    }

    pub async fn record_arrival(&self, id: ShipmentId, actual_arrival_date: DateTime<Utc>) -> CoreResult<Shipment> {
        let mut shipment = self.get_shipment(id).await?;
        shipment.actual_arrival_date = Some(actual_arrival_date);
        self.store(&shipment).await?;

        info!(shipment_id = id, %actual_arrival_date, "Shipment arrival recorded");
        self.publish_arrival(&shipment);
        Ok(shipment)
    }

    pub async fn delayed_shipments(&self, now: DateTime<Utc>) -> CoreResult<Vec<Shipment>> {
        let shipments = self.shipments.list_shipments().await?;
        Ok(shipments.into_iter().filter(|s| tracking::is_delayed(s, now)).collect())
    }

    pub async fn on_time_shipments(&self) -> CoreResult<Vec<Shipment>> {
        let shipments = self.shipments.list_shipments().await?;
        Ok(shipments.into_iter().filter(tracking::is_on_time).collect())
    }

    async fn store(&self, shipment: &Shipment) -> CoreResult<()> {
        if !self.shipments.update_shipment(shipment).await? {
            return Err(CoreError::not_found("Shipment"));
        }
        Ok(())
    }

    fn publish_arrival(&self, shipment: &Shipment) {
        if let Some(actual_arrival_date) = shipment.actual_arrival_date {
            self.events.publish(LogisticsEvent::ShipmentArrived {
                shipment_id: shipment.shipment_id,
                actual_arrival_date,
                timestamp: Utc::now().timestamp(),
            });
        }
    }
}
