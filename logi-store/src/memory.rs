//! In-process store used when no database is configured, and by tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logi_catalog::{inventory, NewProduct, NewSupplier, Product, Supplier};
use logi_core::repository::{
    CancelOutcome, ConsolidationUnit, OrderRepository, ProductRepository, RepoResult, Repositories,
    ShipmentRepository, SupplierRepository,
};
use logi_order::{tracking, Order, OrderDraft, OrderStatus, Shipment, ShipmentDraft};
use logi_shared::{OrderId, ProductId, ShipmentId, SupplierId};
use tokio::sync::{Mutex, OwnedMutexGuard};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    suppliers: BTreeMap<SupplierId, Supplier>,
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    shipments: BTreeMap<ShipmentId, Shipment>,
    last_supplier_id: SupplierId,
    last_product_id: ProductId,
    last_order_id: OrderId,
    last_shipment_id: ShipmentId,
}

impl MemoryState {
    fn shipments_for_order(&self, order_id: OrderId) -> Vec<Shipment> {
        let linked = self.orders.get(&order_id).and_then(|o| o.shipment_id);
        self.shipments
            .values()
            .filter(|s| s.order_id == Some(order_id) || Some(s.shipment_id) == linked)
            .cloned()
            .collect()
    }
}

/// Repositories over a single mutex-guarded state. Ids start at 1 and
/// increase like database sequences.
#[derive(Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<MemoryState>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            suppliers: Arc::new(self.clone()),
            products: Arc::new(self.clone()),
            orders: Arc::new(self.clone()),
            shipments: Arc::new(self.clone()),
        }
    }
}

#[async_trait]
impl SupplierRepository for MemoryStore {
    async fn create_supplier(&self, supplier: NewSupplier) -> RepoResult<Supplier> {
        let mut state = self.state.lock().await;
        state.last_supplier_id += 1;
        let supplier = supplier.into_supplier(state.last_supplier_id);
        state.suppliers.insert(supplier.supplier_id, supplier.clone());
        Ok(supplier)
    }

    async fn get_supplier(&self, id: SupplierId) -> RepoResult<Option<Supplier>> {
        Ok(self.state.lock().await.suppliers.get(&id).cloned())
    }

    async fn list_suppliers(&self) -> RepoResult<Vec<Supplier>> {
        Ok(self.state.lock().await.suppliers.values().cloned().collect())
    }

    async fn update_supplier(&self, supplier: &Supplier) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        match state.suppliers.get_mut(&supplier.supplier_id) {
            Some(stored) => {
                *stored = supplier.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_supplier(&self, id: SupplierId) -> RepoResult<bool> {
        Ok(self.state.lock().await.suppliers.remove(&id).is_some())
    }
}

#[async_trait]
impl ProductRepository for MemoryStore {
    async fn create_product(&self, product: NewProduct) -> RepoResult<Product> {
        let mut state = self.state.lock().await;
        state.last_product_id += 1;
        let product = product.into_product(state.last_product_id);
        state.products.insert(product.product_id, product.clone());
        Ok(product)
    }

    async fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        Ok(self.state.lock().await.products.get(&id).cloned())
    }

    async fn list_products(&self) -> RepoResult<Vec<Product>> {
        Ok(self.state.lock().await.products.values().cloned().collect())
    }

    async fn list_low_stock(&self, threshold: i32) -> RepoResult<Vec<Product>> {
        let state = self.state.lock().await;
        Ok(state
            .products
            .values()
            .filter(|p| p.quantity_available < threshold)
            .cloned()
            .collect())
    }

    async fn update_product(&self, product: &Product) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        match state.products.get_mut(&product.product_id) {
            Some(stored) => {
                let quantity_available = stored.quantity_available;
                *stored = Product {
                    quantity_available,
                    ..product.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn adjust_stock(&self, id: ProductId, amount: i32) -> RepoResult<Option<Product>> {
        let mut state = self.state.lock().await;
        let Some(product) = state.products.get_mut(&id) else {
            return Ok(None);
        };
        if inventory::adjust(product, amount).is_err() {
            return Ok(None);
        }
        Ok(Some(product.clone()))
    }

    async fn set_stock(&self, id: ProductId, quantity: i32) -> RepoResult<Option<Product>> {
        let mut state = self.state.lock().await;
        Ok(state.products.get_mut(&id).map(|product| {
            product.quantity_available = quantity;
            product.clone()
        }))
    }

    async fn delete_product(&self, id: ProductId) -> RepoResult<bool> {
        Ok(self.state.lock().await.products.remove(&id).is_some())
    }
}

#[async_trait]
impl OrderRepository for MemoryStore {
    async fn place_order(&self, order: OrderDraft) -> RepoResult<Option<Order>> {
        let mut state = self.state.lock().await;

        let Some(product) = state.products.get_mut(&order.product_id) else {
            return Ok(None);
        };
        if inventory::reserve(product, order.quantity_ordered).is_err() {
            return Ok(None);
        }

        state.last_order_id += 1;
        let order = order.into_order(state.last_order_id);
        state.orders.insert(order.order_id, order.clone());
        Ok(Some(order))
    }

    async fn get_order(&self, id: OrderId) -> RepoResult<Option<Order>> {
        Ok(self.state.lock().await.orders.get(&id).cloned())
    }

    async fn list_orders(&self) -> RepoResult<Vec<Order>> {
        Ok(self.state.lock().await.orders.values().cloned().collect())
    }

    async fn list_orders_for_supplier(&self, supplier_id: SupplierId) -> RepoResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.supplier_id == supplier_id)
            .cloned()
            .collect())
    }

    async fn list_orders_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn list_orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.order_date >= start && o.order_date <= end)
            .cloned()
            .collect())
    }

    async fn list_orders_for_shipment(&self, shipment_id: ShipmentId) -> RepoResult<Vec<Order>> {
        let state = self.state.lock().await;
        Ok(state
            .orders
            .values()
            .filter(|o| o.shipment_id == Some(shipment_id))
            .cloned()
            .collect())
    }

    async fn cancel_order(&self, id: OrderId) -> RepoResult<CancelOutcome> {
        let mut state = self.state.lock().await;

        if !state.orders.contains_key(&id) {
            return Ok(CancelOutcome::NotFound);
        }
        if state.shipments_for_order(id).iter().any(tracking::is_delivered) {
            return Ok(CancelOutcome::Delivered);
        }
        let Some(order) = state.orders.remove(&id) else {
            return Ok(CancelOutcome::NotFound);
        };
        if let Some(product) = state.products.get_mut(&order.product_id) {
            inventory::restore(product, order.quantity_ordered);
        }
        for shipment in state.shipments.values_mut() {
            if shipment.order_id == Some(id) {
                shipment.order_id = None;
            }
        }
        Ok(CancelOutcome::Cancelled(order))
    }
}

#[async_trait]
impl ShipmentRepository for MemoryStore {
    async fn begin_consolidation(&self) -> RepoResult<Box<dyn ConsolidationUnit>> {
        let guard = self.state.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryUnit { guard, staged }))
    }

    async fn get_shipment(&self, id: ShipmentId) -> RepoResult<Option<Shipment>> {
        Ok(self.state.lock().await.shipments.get(&id).cloned())
    }

    async fn list_shipments(&self) -> RepoResult<Vec<Shipment>> {
        Ok(self.state.lock().await.shipments.values().cloned().collect())
    }

    async fn update_shipment(&self, shipment: &Shipment) -> RepoResult<bool> {
        let mut state = self.state.lock().await;
        match state.shipments.get_mut(&shipment.shipment_id) {
            Some(stored) => {
                stored.shipment_date = shipment.shipment_date;
                stored.estimated_arrival_date = shipment.estimated_arrival_date;
                stored.status = shipment.status.clone();
                stored.actual_arrival_date = shipment.actual_arrival_date;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn list_shipments_for_order(&self, order_id: OrderId) -> RepoResult<Vec<Shipment>> {
        Ok(self.state.lock().await.shipments_for_order(order_id))
    }

    async fn list_shipments_for_supplier(&self, supplier_id: SupplierId) -> RepoResult<Vec<Shipment>> {
        let state = self.state.lock().await;
        let orders: Vec<&Order> = state
            .orders
            .values()
            .filter(|o| o.supplier_id == supplier_id)
            .collect();

        Ok(state
            .shipments
            .values()
            .filter(|s| {
                orders.iter().any(|o| {
                    o.shipment_id == Some(s.shipment_id) || s.order_id == Some(o.order_id)
                })
            })
            .cloned()
            .collect())
    }
}

/// Holds the store lock for the whole consolidation and writes the staged
/// copy back only on commit.
struct MemoryUnit {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
}

#[async_trait]
impl ConsolidationUnit for MemoryUnit {
    async fn lock_orders(&mut self, ids: &[OrderId]) -> RepoResult<Vec<Order>> {
        Ok(self
            .staged
            .orders
            .values()
            .filter(|o| ids.contains(&o.order_id))
            .cloned()
            .collect())
    }

    async fn get_supplier(&mut self, id: SupplierId) -> RepoResult<Option<Supplier>> {
        Ok(self.staged.suppliers.get(&id).cloned())
    }

    async fn insert_shipment(&mut self, shipment: ShipmentDraft) -> RepoResult<Shipment> {
        self.staged.last_shipment_id += 1;
        let shipment = shipment.into_shipment(self.staged.last_shipment_id);
        self.staged.shipments.insert(shipment.shipment_id, shipment.clone());
        Ok(shipment)
    }

    async fn link_order(
        &mut self,
        order_id: OrderId,
        shipment_id: ShipmentId,
        status: OrderStatus,
    ) -> RepoResult<bool> {
        match self.staged.orders.get_mut(&order_id) {
            Some(order) => {
                order.shipment_id = Some(shipment_id);
                order.status = status;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let MemoryUnit { mut guard, staged } = *self;
        *guard = staged;
        Ok(())
    }
}
