pub mod app_config;
pub mod database;
pub mod events;
pub mod memory;
pub mod order_repo;
pub mod product_repo;
pub mod shipment_repo;
pub mod supplier_repo;

mod rows;

pub use database::DbClient;
pub use events::EventBroadcaster;
pub use memory::MemoryStore;
pub use order_repo::StoreOrderRepository;
pub use product_repo::StoreProductRepository;
pub use shipment_repo::{StoreConsolidationUnit, StoreShipmentRepository};
pub use supplier_repo::StoreSupplierRepository;
