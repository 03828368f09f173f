//! Persistence ports. Storage adapters live in `logi-store`.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logi_catalog::{NewProduct, NewSupplier, Product, Supplier};
use logi_order::{Order, OrderDraft, OrderStatus, Shipment, ShipmentDraft};
use logi_shared::{OrderId, ProductId, ShipmentId, SupplierId};

pub type RepoError = Box<dyn std::error::Error + Send + Sync>;
pub type RepoResult<T> = Result<T, RepoError>;

/// Repository trait for supplier data access
#[async_trait]
pub trait SupplierRepository: Send + Sync {
    async fn create_supplier(&self, supplier: NewSupplier) -> RepoResult<Supplier>;

    async fn get_supplier(&self, id: SupplierId) -> RepoResult<Option<Supplier>>;

    async fn list_suppliers(&self) -> RepoResult<Vec<Supplier>>;

    /// Writes every field of `supplier`. Returns false if the row is gone.
    async fn update_supplier(&self, supplier: &Supplier) -> RepoResult<bool>;

    async fn delete_supplier(&self, id: SupplierId) -> RepoResult<bool>;
}

/// Repository trait for product catalog access
#[async_trait]
pub trait ProductRepository: Send + Sync {
    async fn create_product(&self, product: NewProduct) -> RepoResult<Product>;

    async fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>>;

    async fn list_products(&self) -> RepoResult<Vec<Product>>;

    async fn list_low_stock(&self, threshold: i32) -> RepoResult<Vec<Product>>;

    /// Writes the descriptive fields. Stock only moves through
    /// `adjust_stock`, `set_stock` and order placement or cancellation.
    async fn update_product(&self, product: &Product) -> RepoResult<bool>;

    /// Adds `amount` to the available quantity in one atomic step. Returns
    /// `None` when the product is missing or the result would be negative.
    async fn adjust_stock(&self, id: ProductId, amount: i32) -> RepoResult<Option<Product>>;

    /// Replaces the available quantity. Returns `None` when the product is missing.
    async fn set_stock(&self, id: ProductId, quantity: i32) -> RepoResult<Option<Product>>;

    async fn delete_product(&self, id: ProductId) -> RepoResult<bool>;
}

/// Repository trait for order data access
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// Inserts the order and takes its quantity out of the product's stock in
    /// one atomic step. Returns `None` when the stock no longer covers it.
    async fn place_order(&self, order: OrderDraft) -> RepoResult<Option<Order>>;

    async fn get_order(&self, id: OrderId) -> RepoResult<Option<Order>>;

    async fn list_orders(&self) -> RepoResult<Vec<Order>>;

    async fn list_orders_for_supplier(&self, supplier_id: SupplierId) -> RepoResult<Vec<Order>>;

    async fn list_orders_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Order>>;

    /// Orders placed within `[start, end]`.
    async fn list_orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Order>>;

    /// The orders pointing back at a shipment.
    async fn list_orders_for_shipment(&self, shipment_id: ShipmentId) -> RepoResult<Vec<Order>>;

    /// Deletes the order and returns its quantity to stock atomically,
    /// unless a shipment carrying it has been delivered.
    async fn cancel_order(&self, id: OrderId) -> RepoResult<CancelOutcome>;
}

/// Result of an order cancellation attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum CancelOutcome {
    Cancelled(Order),
    Delivered,
    NotFound,
}

/// Repository trait for shipment data access
#[async_trait]
pub trait ShipmentRepository: Send + Sync {
    /// Opens the unit of work a consolidation runs in.
    async fn begin_consolidation(&self) -> RepoResult<Box<dyn ConsolidationUnit>>;

    async fn get_shipment(&self, id: ShipmentId) -> RepoResult<Option<Shipment>>;

    async fn list_shipments(&self) -> RepoResult<Vec<Shipment>>;

    /// Writes the mutable fields (dates and status). Returns false if the row is gone.
    async fn update_shipment(&self, shipment: &Shipment) -> RepoResult<bool>;

    /// Shipments whose primary pointer is `order_id` or that the order is linked to.
    async fn list_shipments_for_order(&self, order_id: OrderId) -> RepoResult<Vec<Shipment>>;

    /// Shipments carrying at least one order of the supplier.
    async fn list_shipments_for_supplier(&self, supplier_id: SupplierId) -> RepoResult<Vec<Shipment>>;
}

/// One consolidation's reads and writes. Dropping the unit without
/// `commit` discards every write made through it.
#[async_trait]
pub trait ConsolidationUnit: Send {
    /// Loads and locks the orders matching `ids`, ascending by id.
    async fn lock_orders(&mut self, ids: &[OrderId]) -> RepoResult<Vec<Order>>;

    async fn get_supplier(&mut self, id: SupplierId) -> RepoResult<Option<Supplier>>;

    async fn insert_shipment(&mut self, shipment: ShipmentDraft) -> RepoResult<Shipment>;

    /// Points an order at a shipment and sets its status. Returns false if the order is gone.
    async fn link_order(
        &mut self,
        order_id: OrderId,
        shipment_id: ShipmentId,
        status: OrderStatus,
    ) -> RepoResult<bool>;

    async fn commit(self: Box<Self>) -> RepoResult<()>;
}

/// The full set of ports, handed to services and the API state.
#[derive(Clone)]
pub struct Repositories {
    pub suppliers: Arc<dyn SupplierRepository>,
    pub products: Arc<dyn ProductRepository>,
    pub orders: Arc<dyn OrderRepository>,
    pub shipments: Arc<dyn ShipmentRepository>,
}
