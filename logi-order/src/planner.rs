use logi_shared::SupplierId;

use crate::models::{shipment_status, ConsolidationRequest, Order, Priority, ShipmentDraft};

pub const DEFAULT_SURCHARGE_RATE: f64 = 10.0;
pub const URGENT_BELOW_CAPACITY_REASON: &str = "Urgent dispatch below capacity";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConsolidationError {
    #[error("No valid orders found for shipment")]
    NoValidOrders,

    #[error("All orders in a shipment must belong to the same supplier (expected {expected}, found {found})")]
    MixedSupplierOrders {
        expected: SupplierId,
        found: SupplierId,
    },

    #[error("Invalid shipment request: {0}")]
    InvalidRequest(String),
}

/// Turns a set of resolved orders into a shipment: load, capacity, status and surcharge.
#[derive(Debug, Clone)]
pub struct ConsolidationPlanner {
    surcharge_rate: f64,
}

impl ConsolidationPlanner {
    /// `surcharge_rate` is charged per unit of volume an urgent shipment is short of capacity.
    pub fn new(surcharge_rate: f64) -> Self {
        Self { surcharge_rate }
    }

    /// Supplier shared by every order, taken from the first one.
    pub fn reference_supplier(orders: &[Order]) -> Result<SupplierId, ConsolidationError> {
        let first = orders.first().ok_or(ConsolidationError::NoValidOrders)?;

        match orders.iter().find(|o| o.supplier_id != first.supplier_id) {
            Some(other) => Err(ConsolidationError::MixedSupplierOrders {
                expected: first.supplier_id,
                found: other.supplier_id,
            }),
            None => Ok(first.supplier_id),
        }
    }

    /// Plans a shipment for `orders`. `required_capacity` is the reference
    /// supplier's threshold.
    pub fn plan(
        &self,
        request: &ConsolidationRequest,
        orders: &[Order],
        required_capacity: f64,
    ) -> Result<ShipmentDraft, ConsolidationError> {
        if request.status.trim().is_empty() {
            return Err(ConsolidationError::InvalidRequest(
                "status must not be empty".to_string(),
            ));
        }
        Self::reference_supplier(orders)?;

        let primary = orders[0].order_id;
        let current_load = current_load(orders);
        let below_capacity = current_load < required_capacity;

        let mut status = request.status.clone();
        let mut extra_charge = 0.0;
        let mut cost_reason = None;

        match request.priority {
            Priority::Urgent => {
                if below_capacity {
                    extra_charge = (required_capacity - current_load) * self.surcharge_rate;
                    cost_reason = Some(URGENT_BELOW_CAPACITY_REASON.to_string());
                }
            }
            Priority::Normal => {
                if below_capacity {
                    status = shipment_status::WAITING.to_string();
                } else if status == shipment_status::PENDING {
                    status = shipment_status::PLANNING.to_string();
                }
            }
        }

        Ok(ShipmentDraft {
            order_id: primary,
            shipment_date: request.shipment_date,
            estimated_arrival_date: request.estimated_arrival_date,
            actual_arrival_date: request.actual_arrival_date,
            status,
            priority: request.priority,
            required_capacity,
            current_load,
            load_percentage: load_percentage(current_load, required_capacity),
            extra_charge,
            total_cost: extra_charge,
            cost_reason,
        })
    }
}

impl Default for ConsolidationPlanner {
    fn default() -> Self {
        Self::new(DEFAULT_SURCHARGE_RATE)
    }
}

/// Summed order volume, missing volumes counting as zero.
pub fn current_load(orders: &[Order]) -> f64 {
    orders.iter().map(Order::volume_or_zero).sum()
}

/// Load as a percentage of capacity; a zero capacity is always full.
pub fn load_percentage(current_load: f64, required_capacity: f64) -> f64 {
    if required_capacity > 0.0 {
        current_load / required_capacity * 100.0
    } else {
        100.0
    }
}
