//! Row identifiers. All entities use database-assigned integer keys.

pub type SupplierId = i64;
pub type ProductId = i64;
pub type OrderId = i64;
pub type ShipmentId = i64;
