use chrono::{DateTime, Utc};

use crate::ids::{OrderId, ProductId, ShipmentId, SupplierId};

/// Domain events published after a state change has been committed.
#[derive(Debug, serde::Serialize, serde::Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LogisticsEvent {
    OrderPlaced {
        order_id: OrderId,
        product_id: ProductId,
        supplier_id: SupplierId,
        quantity_ordered: i32,
        timestamp: i64,
    },
    OrderCancelled {
        order_id: OrderId,
        product_id: ProductId,
        quantity_restored: i32,
        timestamp: i64,
    },
    ShipmentConsolidated {
        shipment_id: ShipmentId,
        supplier_id: SupplierId,
        order_ids: Vec<OrderId>,
        status: String,
        current_load: f64,
        extra_charge: f64,
        timestamp: i64,
    },
    ShipmentArrived {
        shipment_id: ShipmentId,
        actual_arrival_date: DateTime<Utc>,
        timestamp: i64,
    },
}

impl LogisticsEvent {
    /// Name used as the SSE event type.
    pub fn kind(&self) -> &'static str {
        match self {
            LogisticsEvent::OrderPlaced { .. } => "order_placed",
            LogisticsEvent::OrderCancelled { .. } => "order_cancelled",
            LogisticsEvent::ShipmentConsolidated { .. } => "shipment_consolidated",
            LogisticsEvent::ShipmentArrived { .. } => "shipment_arrived",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_is_tagged_with_its_kind() {
        let event = LogisticsEvent::OrderCancelled {
            order_id: 7,
            product_id: 3,
            quantity_restored: 4,
            timestamp: 0,
        };

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], event.kind());
        assert_eq!(json["quantity_restored"], 4);
    }
}
