use logi_catalog::inventory::InventoryError;
use logi_catalog::{NewProduct, NewSupplier, Product, ProductUpdate, Supplier, SupplierUpdate};
use logi_order::{Order, Shipment};
use logi_shared::{ProductId, SupplierId};
use tracing::info;

use crate::repository::Repositories;
use crate::{CoreError, CoreResult};

/// Supplier and product maintenance.
pub struct CatalogService {
    repos: Repositories,
    low_stock_threshold: i32,
}

impl CatalogService {
    pub fn new(repos: Repositories, low_stock_threshold: i32) -> Self {
        Self {
            repos,
            low_stock_threshold,
        }
    }

    // Suppliers

    pub async fn create_supplier(&self, supplier: NewSupplier) -> CoreResult<Supplier> {
        supplier.validate()?;
        let supplier = self.repos.suppliers.create_supplier(supplier).await?;
        info!(supplier_id = supplier.supplier_id, "Supplier created");
        Ok(supplier)
    }

    pub async fn get_supplier(&self, id: SupplierId) -> CoreResult<Supplier> {
        self.repos
            .suppliers
            .get_supplier(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Supplier"))
    }

    pub async fn list_suppliers(&self) -> CoreResult<Vec<Supplier>> {
        Ok(self.repos.suppliers.list_suppliers().await?)
    }

    pub async fn update_supplier(&self, id: SupplierId, update: SupplierUpdate) -> CoreResult<Supplier> {
        let mut supplier = self.get_supplier(id).await?;
        update.apply(&mut supplier)?;
        if !self.repos.suppliers.update_supplier(&supplier).await? {
            return Err(CoreError::not_found("Supplier"));
        }
        info!(supplier_id = id, "Supplier updated");
        Ok(supplier)
    }

    /// Suppliers with orders on record cannot be deleted.
    pub async fn delete_supplier(&self, id: SupplierId) -> CoreResult<()> {
        self.get_supplier(id).await?;
        if !self.repos.orders.list_orders_for_supplier(id).await?.is_empty() {
            return Err(CoreError::Conflict(format!("Supplier {} still has orders", id)));
        }
        if !self.repos.suppliers.delete_supplier(id).await? {
            return Err(CoreError::not_found("Supplier"));
        }
        info!(supplier_id = id, "Supplier deleted");
        Ok(())
    }

    pub async fn supplier_orders(&self, id: SupplierId) -> CoreResult<Vec<Order>> {
        self.get_supplier(id).await?;
        Ok(self.repos.orders.list_orders_for_supplier(id).await?)
    }

    pub async fn supplier_shipments(&self, id: SupplierId) -> CoreResult<Vec<Shipment>> {
        self.get_supplier(id).await?;
        Ok(self.repos.shipments.list_shipments_for_supplier(id).await?)
    }

    // Products

    pub async fn create_product(&self, product: NewProduct) -> CoreResult<Product> {
        product.validate()?;
        let product = self.repos.products.create_product(product).await?;
        info!(product_id = product.product_id, "Product created");
        Ok(product)
    }

    pub async fn get_product(&self, id: ProductId) -> CoreResult<Product> {
        self.repos
            .products
            .get_product(id)
            .await?
            .ok_or_else(|| CoreError::not_found("Product"))
    }

    pub async fn list_products(&self) -> CoreResult<Vec<Product>> {
        Ok(self.repos.products.list_products().await?)
    }

    /// Products below `threshold`, or below the configured threshold when none is given.
    pub async fn low_stock(&self, threshold: Option<i32>) -> CoreResult<Vec<Product>> {
        let threshold = threshold.unwrap_or(self.low_stock_threshold);
        Ok(self.repos.products.list_low_stock(threshold).await?)
    }

    pub async fn update_product(&self, id: ProductId, update: ProductUpdate) -> CoreResult<Product> {
        let mut product = self.get_product(id).await?;
        let stock = update.quantity_available;
        update.apply(&mut product)?;
        self.store_product(&product).await?;
        if let Some(quantity) = stock {
            product = self
                .repos
                .products
                .set_stock(id, quantity)
                .await?
                .ok_or_else(|| CoreError::not_found("Product"))?;
        }
        info!(product_id = id, "Product updated");
        Ok(product)
    }

    /// Adds `amount` (possibly negative) to the available quantity.
    pub async fn adjust_stock(&self, id: ProductId, amount: i32) -> CoreResult<Product> {
        let Some(product) = self.repos.products.adjust_stock(id, amount).await? else {
            let product = self.get_product(id).await?;
            return Err(InventoryError::NegativeStock {
                available: product.quantity_available,
                adjustment: amount,
            }
            .into());
        };
        info!(product_id = id, amount, available = product.quantity_available, "Stock adjusted");
        Ok(product)
    }

    pub async fn delete_product(&self, id: ProductId) -> CoreResult<()> {
        self.get_product(id).await?;
        if !self.repos.orders.list_orders_for_product(id).await?.is_empty() {
            return Err(CoreError::Conflict(format!("Product {} still has orders", id)));
        }
        if !self.repos.products.delete_product(id).await? {
            return Err(CoreError::not_found("Product"));
        }
        info!(product_id = id, "Product deleted");
        Ok(())
    }

    async fn store_product(&self, product: &Product) -> CoreResult<()> {
        if !self.repos.products.update_product(product).await? {
            return Err(CoreError::not_found("Product"));
        }
        Ok(())
    }
}
