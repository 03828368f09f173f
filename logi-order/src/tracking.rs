//! Arrival tracking over shipment dates.

use chrono::{DateTime, Utc};

use crate::models::{shipment_status, Shipment};

/// Arrived after the estimate, or still underway past it.
pub fn is_delayed(shipment: &Shipment, now: DateTime<Utc>) -> bool {
    match shipment.actual_arrival_date {
        Some(actual) => actual > shipment.estimated_arrival_date,
        None => now > shipment.estimated_arrival_date,
    }
}

/// Arrived no later than the estimate. Shipments still underway are neither on time nor delayed
/// until their estimate passes.
pub fn is_on_time(shipment: &Shipment) -> bool {
    matches!(shipment.actual_arrival_date, Some(actual) if actual <= shipment.estimated_arrival_date)
}

pub fn is_delivered(shipment: &Shipment) -> bool {
    shipment.status == shipment_status::DELIVERED
}

pub fn is_active(shipment: &Shipment) -> bool {
    !is_delivered(shipment)
}
