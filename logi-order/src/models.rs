use chrono::{DateTime, Utc};
use logi_shared::{OrderId, ProductId, ShipmentId, SupplierId};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::OrderError;

/// Well-known shipment statuses. Shipment status is free text, callers may
/// declare others ("In Transit", "Delayed", ...).
pub mod shipment_status {
    pub const PENDING: &str = "Pending";
    pub const PLANNING: &str = "Planning";
    pub const WAITING: &str = "Waiting";
    pub const DELIVERED: &str = "Delivered";
}

/// Order status. Cancellation deletes the order, so it has no variant here.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    Scheduled,
    Waiting,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::Scheduled => "Scheduled",
            OrderStatus::Waiting => "Waiting",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Pending" => Ok(OrderStatus::Pending),
            "Scheduled" => Ok(OrderStatus::Scheduled),
            "Waiting" => Ok(OrderStatus::Waiting),
            other => Err(OrderError::UnknownStatus(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Order {
    pub order_id: OrderId,
    pub product_id: ProductId,
    pub supplier_id: SupplierId,
    pub order_date: DateTime<Utc>,
    pub quantity_ordered: i32,
    /// Quantity times the product's unit volume, computed when the order was placed.
    pub total_volume: Option<f64>,
    pub status: OrderStatus,
    pub shipment_id: Option<ShipmentId>,
}

impl Order {
    pub fn volume_or_zero(&self) -> f64 {
        self.total_volume.unwrap_or(0.0)
    }
}

/// Order placement payload.
#[derive(Debug, Clone, Deserialize)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub supplier_id: SupplierId,
    #[serde(default)]
    pub order_date: Option<DateTime<Utc>>,
    pub quantity_ordered: i32,
}

/// An order ready for insertion, with its volume already fixed.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderDraft {
    pub product_id: ProductId,
    pub supplier_id: SupplierId,
    pub order_date: DateTime<Utc>,
    pub quantity_ordered: i32,
    pub total_volume: Option<f64>,
}

impl OrderDraft {
    pub fn into_order(self, order_id: OrderId) -> Order {
        Order {
            order_id,
            product_id: self.product_id,
            supplier_id: self.supplier_id,
            order_date: self.order_date,
            quantity_ordered: self.quantity_ordered,
            total_volume: self.total_volume,
            status: OrderStatus::Pending,
            shipment_id: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    #[default]
    Normal,
    Urgent,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::Normal => "normal",
            Priority::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = OrderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(Priority::Normal),
            "urgent" => Ok(Priority::Urgent),
            other => Err(OrderError::UnknownPriority(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Shipment {
    pub shipment_id: ShipmentId,
    /// Legacy single-order pointer: the first consolidated order. Cleared if
    /// that order is cancelled.
    pub order_id: Option<OrderId>,
    pub shipment_date: DateTime<Utc>,
    pub estimated_arrival_date: DateTime<Utc>,
    pub actual_arrival_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: Priority,
    pub required_capacity: f64,
    pub current_load: f64,
    pub load_percentage: f64,
    pub extra_charge: f64,
    pub total_cost: f64,
    pub cost_reason: Option<String>,
}

/// Planner output: a shipment without its storage identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct ShipmentDraft {
    pub order_id: OrderId,
    pub shipment_date: DateTime<Utc>,
    pub estimated_arrival_date: DateTime<Utc>,
    pub actual_arrival_date: Option<DateTime<Utc>>,
    pub status: String,
    pub priority: Priority,
    pub required_capacity: f64,
    pub current_load: f64,
    pub load_percentage: f64,
    pub extra_charge: f64,
    pub total_cost: f64,
    pub cost_reason: Option<String>,
}

impl ShipmentDraft {
    pub fn into_shipment(self, shipment_id: ShipmentId) -> Shipment {
        Shipment {
            shipment_id,
            order_id: Some(self.order_id),
            shipment_date: self.shipment_date,
            estimated_arrival_date: self.estimated_arrival_date,
            actual_arrival_date: self.actual_arrival_date,
            status: self.status,
            priority: self.priority,
            required_capacity: self.required_capacity,
            current_load: self.current_load,
            load_percentage: self.load_percentage,
            extra_charge: self.extra_charge,
            total_cost: self.total_cost,
            cost_reason: self.cost_reason,
        }
    }
}

/// "Create shipment" request.
#[derive(Debug, Clone, Deserialize)]
pub struct ConsolidationRequest {
    #[serde(default)]
    pub order_id: Option<OrderId>,
    #[serde(default)]
    pub order_ids: Option<Vec<OrderId>>,
    pub shipment_date: DateTime<Utc>,
    pub estimated_arrival_date: DateTime<Utc>,
    pub status: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub actual_arrival_date: Option<DateTime<Utc>>,
}

impl ConsolidationRequest {
    /// Ids to resolve: a non-empty `order_ids` list wins over the single
    /// `order_id`. Duplicates are dropped, first occurrence kept.
    pub fn requested_order_ids(&self) -> Vec<OrderId> {
        let ids: Vec<OrderId> = match &self.order_ids {
            Some(ids) if !ids.is_empty() => ids.clone(),
            _ => self.order_id.into_iter().collect(),
        };

        let mut seen = std::collections::HashSet::new();
        ids.into_iter().filter(|id| seen.insert(*id)).collect()
    }
}

/// Partial shipment update. Load, capacity and cost fields are fixed at
/// creation and deliberately absent.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ShipmentUpdate {
    pub shipment_date: Option<DateTime<Utc>>,
    pub estimated_arrival_date: Option<DateTime<Utc>>,
    pub status: Option<String>,
    pub actual_arrival_date: Option<DateTime<Utc>>,
}

impl ShipmentUpdate {
    pub fn apply(self, shipment: &mut Shipment) -> Result<(), OrderError> {
        if matches!(&self.status, Some(status) if status.trim().is_empty()) {
            return Err(OrderError::ValidationError("status must not be empty".to_string()));
        }

        if let Some(date) = self.shipment_date {
            shipment.shipment_date = date;
        }
        if let Some(date) = self.estimated_arrival_date {
            shipment.estimated_arrival_date = date;
        }
        if let Some(status) = self.status {
            shipment.status = status;
        }
        if let Some(date) = self.actual_arrival_date {
            shipment.actual_arrival_date = Some(date);
        }
        Ok(())
    }
}
