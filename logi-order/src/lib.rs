pub mod models;
pub mod planner;
pub mod propagation;
pub mod tracking;

pub use models::{
    shipment_status, ConsolidationRequest, NewOrder, Order, OrderDraft, OrderStatus, Priority,
    Shipment, ShipmentDraft, ShipmentUpdate,
};
pub use planner::{ConsolidationError, ConsolidationPlanner};
pub use propagation::{order_status_for, propagate};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum OrderError {
    #[error("Validation failed: {0}")]
    ValidationError(String),

    #[error("Unknown order status: {0}")]
    UnknownStatus(String),

    #[error("Unknown priority: {0}")]
    UnknownPriority(String),
}
