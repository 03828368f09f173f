//! Mirrors a shipment's outcome onto its constituent orders.

use crate::models::{shipment_status, Order, OrderStatus, Shipment};

/// Order status implied by a shipment status: held shipments hold their
/// orders, anything else schedules them.
pub fn order_status_for(status: &str) -> OrderStatus {
    if status == shipment_status::WAITING {
        OrderStatus::Waiting
    } else {
        OrderStatus::Scheduled
    }
}

/// Links every order to `shipment` and sets its status. Unconditional: the
/// capacity decision is not re-evaluated per order.
pub fn propagate(shipment: &Shipment, orders: &mut [Order]) {
    let status = order_status_for(&shipment.status);
    for order in orders.iter_mut() {
        order.shipment_id = Some(shipment.shipment_id);
        order.status = status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Priority, ShipmentDraft};
    use chrono::{TimeZone, Utc};

    fn shipment(status: &str) -> Shipment {
        ShipmentDraft {
            order_id: 1,
            shipment_date: Utc.with_ymd_and_hms(2024, 3, 1, 8, 0, 0).unwrap(),
            estimated_arrival_date: Utc.with_ymd_and_hms(2024, 3, 4, 8, 0, 0).unwrap(),
            actual_arrival_date: None,
            status: status.to_string(),
            priority: Priority::Normal,
            required_capacity: 0.0,
            current_load: 0.0,
            load_percentage: 100.0,
            extra_charge: 0.0,
            total_cost: 0.0,
            cost_reason: None,
        }
        .into_shipment(42)
    }

    fn orders() -> Vec<Order> {
        (1..=3)
            .map(|order_id| Order {
                order_id,
                product_id: 1,
                supplier_id: 1,
                order_date: Utc.with_ymd_and_hms(2024, 2, 1, 9, 0, 0).unwrap(),
                quantity_ordered: 2,
                total_volume: Some(1.0),
                status: OrderStatus::Pending,
                shipment_id: None,
            })
            .collect()
    }

    #[test]
    fn test_waiting_shipment_holds_orders() {
        let mut orders = orders();
        propagate(&shipment("Waiting"), &mut orders);

        assert!(orders.iter().all(|o| o.status == OrderStatus::Waiting));
        assert!(orders.iter().all(|o| o.shipment_id == Some(42)));
    }

    #[test]
    fn test_any_other_status_schedules_orders() {
        for status in ["Pending", "Planning", "In Transit", "Delivered"] {
            let mut orders = orders();
            propagate(&shipment(status), &mut orders);
            assert!(orders.iter().all(|o| o.status == OrderStatus::Scheduled), "{}", status);
        }
    }
}
