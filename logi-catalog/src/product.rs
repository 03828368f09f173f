use logi_shared::ProductId;
use serde::{Deserialize, Serialize};

use crate::{require_non_negative, require_text, CatalogError, CatalogResult};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Product {
    pub product_id: ProductId,
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub quantity_available: i32,
    /// Volume of a single unit. Orders for products without one carry no volume.
    pub unit_volume: Option<f64>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub unit_price: f64,
    pub quantity_available: i32,
    #[serde(default)]
    pub unit_volume: Option<f64>,
}

impl NewProduct {
    pub fn validate(&self) -> CatalogResult<()> {
        require_text("name", &self.name)?;
        require_non_negative("unit_price", self.unit_price)?;
        if self.quantity_available < 0 {
            return Err(CatalogError::ValidationError(
                "quantity_available must not be negative".to_string(),
            ));
        }
        if let Some(volume) = self.unit_volume {
            require_non_negative("unit_volume", volume)?;
        }
        Ok(())
    }

    pub fn into_product(self, product_id: ProductId) -> Product {
        Product {
            product_id,
            name: self.name,
            description: self.description,
            unit_price: self.unit_price,
            quantity_available: self.quantity_available,
            unit_volume: self.unit_volume,
        }
    }
}

/// Partial product update over a fixed field list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub unit_price: Option<f64>,
    pub quantity_available: Option<i32>,
    pub unit_volume: Option<f64>,
}

impl ProductUpdate {
    pub fn apply(self, product: &mut Product) -> CatalogResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(price) = self.unit_price {
            require_non_negative("unit_price", price)?;
        }
        if let Some(volume) = self.unit_volume {
            require_non_negative("unit_volume", volume)?;
        }
        if matches!(self.quantity_available, Some(q) if q < 0) {
            return Err(CatalogError::ValidationError(
                "quantity_available must not be negative".to_string(),
            ));
        }

        if let Some(name) = self.name {
            product.name = name;
        }
        if let Some(description) = self.description {
            product.description = Some(description);
        }
        if let Some(price) = self.unit_price {
            product.unit_price = price;
        }
        if let Some(quantity) = self.quantity_available {
            product.quantity_available = quantity;
        }
        if let Some(volume) = self.unit_volume {
            product.unit_volume = Some(volume);
        }
        Ok(())
    }
}
