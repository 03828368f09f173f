pub mod inventory;
pub mod product;
pub mod supplier;

pub use inventory::InventoryError;
pub use product::{NewProduct, Product, ProductUpdate};
pub use supplier::{NewSupplier, Supplier, SupplierUpdate};

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum CatalogError {
    #[error("Validation failed: {0}")]
    ValidationError(String),
}

pub type CatalogResult<T> = Result<T, CatalogError>;

fn require_text(field: &str, value: &str) -> CatalogResult<()> {
    if value.trim().is_empty() {
        return Err(CatalogError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

fn require_non_negative(field: &str, value: f64) -> CatalogResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(CatalogError::ValidationError(format!(
            "{} must be a non-negative number",
            field
        )));
    }
    Ok(())
}
