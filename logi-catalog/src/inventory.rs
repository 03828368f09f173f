//! Stock rules applied when orders are placed or cancelled.

use crate::product::Product;

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum InventoryError {
    #[error("Insufficient stock available: requested {requested}, available {available}")]
    InsufficientStock {
        requested: i32,
        available: i32,
    },

    #[error("Stock cannot be negative: {available} available, adjustment {adjustment}")]
    NegativeStock {
        available: i32,
        adjustment: i32,
    },

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),
}

pub fn has_stock(product: &Product, quantity: i32) -> bool {
    product.quantity_available >= quantity
}

/// Takes `quantity` units out of stock for a new order.
pub fn reserve(product: &mut Product, quantity: i32) -> Result<(), InventoryError> {
    if quantity <= 0 {
        return Err(InventoryError::InvalidQuantity(quantity));
    }
    if !has_stock(product, quantity) {
        return Err(InventoryError::InsufficientStock {
            requested: quantity,
            available: product.quantity_available,
        });
    }
    product.quantity_available -= quantity;
    Ok(())
}

/// Puts the units of a cancelled order back.
pub fn restore(product: &mut Product, quantity: i32) {
    product.quantity_available = product.quantity_available.saturating_add(quantity);
}

/// Manual stock correction. `amount` may be negative.
pub fn adjust(product: &mut Product, amount: i32) -> Result<(), InventoryError> {
    let adjusted = product.quantity_available.saturating_add(amount);
    if adjusted < 0 {
        return Err(InventoryError::NegativeStock {
            available: product.quantity_available,
            adjustment: amount,
        });
    }
    product.quantity_available = adjusted;
    Ok(())
}

pub fn is_low_stock(product: &Product, threshold: i32) -> bool {
    product.quantity_available < threshold
}

/// Total volume of an order line, fixed at order time.
pub fn order_volume(product: &Product, quantity: i32) -> Option<f64> {
    product.unit_volume.map(|unit| unit * f64::from(quantity))
}
