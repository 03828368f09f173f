//! Row shapes for runtime-checked queries, shared by the Postgres repositories.

use chrono::{DateTime, Utc};
use logi_catalog::{Product, Supplier};
use logi_order::{Order, OrderError, Shipment};

pub(crate) const SUPPLIER_COLUMNS: &str =
    "supplier_id, name, address, contact_person, phone_number, min_capacity";

pub(crate) const PRODUCT_COLUMNS: &str =
    "product_id, name, description, unit_price, quantity_available, unit_volume";

pub(crate) const ORDER_COLUMNS: &str =
    "order_id, product_id, supplier_id, order_date, quantity_ordered, total_volume, status, shipment_id";

pub(crate) const SHIPMENT_COLUMNS: &str = "shipment_id, order_id, shipment_date, estimated_arrival_date, \
     actual_arrival_date, status, priority, required_capacity, current_load, load_percentage, \
     extra_charge, total_cost, cost_reason";

#[derive(sqlx::FromRow)]
pub(crate) struct SupplierRow {
    supplier_id: i64,
    name: String,
    address: String,
    contact_person: Option<String>,
    phone_number: Option<String>,
    min_capacity: Option<f64>,
}

impl From<SupplierRow> for Supplier {
    fn from(row: SupplierRow) -> Self {
        Supplier {
            supplier_id: row.supplier_id,
            name: row.name,
            address: row.address,
            contact_person: row.contact_person,
            phone_number: row.phone_number.map(Into::into),
            min_capacity: row.min_capacity,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ProductRow {
    product_id: i64,
    name: String,
    description: Option<String>,
    unit_price: f64,
    quantity_available: i32,
    unit_volume: Option<f64>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            product_id: row.product_id,
            name: row.name,
            description: row.description,
            unit_price: row.unit_price,
            quantity_available: row.quantity_available,
            unit_volume: row.unit_volume,
        }
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct OrderRow {
    order_id: i64,
    product_id: i64,
    supplier_id: i64,
    order_date: DateTime<Utc>,
    quantity_ordered: i32,
    total_volume: Option<f64>,
    status: String,
    shipment_id: Option<i64>,
}

impl TryFrom<OrderRow> for Order {
    type Error = OrderError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        Ok(Order {
            order_id: row.order_id,
            product_id: row.product_id,
            supplier_id: row.supplier_id,
            order_date: row.order_date,
            quantity_ordered: row.quantity_ordered,
            total_volume: row.total_volume,
            status: row.status.parse()?,
            shipment_id: row.shipment_id,
        })
    }
}

#[derive(sqlx::FromRow)]
pub(crate) struct ShipmentRow {
    shipment_id: i64,
    order_id: Option<i64>,
    shipment_date: DateTime<Utc>,
    estimated_arrival_date: DateTime<Utc>,
    actual_arrival_date: Option<DateTime<Utc>>,
    status: String,
    priority: String,
    required_capacity: f64,
    current_load: f64,
    load_percentage: f64,
    extra_charge: f64,
    total_cost: f64,
    cost_reason: Option<String>,
}

impl TryFrom<ShipmentRow> for Shipment {
    type Error = OrderError;

    fn try_from(row: ShipmentRow) -> Result<Self, Self::Error> {
        Ok(Shipment {
            shipment_id: row.shipment_id,
            order_id: row.order_id,
            shipment_date: row.shipment_date,
            estimated_arrival_date: row.estimated_arrival_date,
            actual_arrival_date: row.actual_arrival_date,
            status: row.status,
            priority: row.priority.parse()?,
            required_capacity: row.required_capacity,
            current_load: row.current_load,
            load_percentage: row.load_percentage,
            extra_charge: row.extra_charge,
            total_cost: row.total_cost,
            cost_reason: row.cost_reason,
        })
    }
}

pub(crate) fn orders_from_rows(rows: Vec<OrderRow>) -> Result<Vec<Order>, OrderError> {
    rows.into_iter().map(Order::try_from).collect()
}

pub(crate) fn shipments_from_rows(rows: Vec<ShipmentRow>) -> Result<Vec<Shipment>, OrderError> {
    rows.into_iter().map(Shipment::try_from).collect()
}
