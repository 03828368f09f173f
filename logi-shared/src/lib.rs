pub mod ids;
pub mod models;
pub mod pii;

pub use ids::{OrderId, ProductId, ShipmentId, SupplierId};
pub use pii::Masked;
