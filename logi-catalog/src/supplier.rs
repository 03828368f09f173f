use logi_shared::{Masked, SupplierId};
use serde::{Deserialize, Serialize};

use crate::{require_non_negative, require_text, CatalogResult};

/// A supplier and its consolidation threshold.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Supplier {
    pub supplier_id: SupplierId,
    pub name: String,
    pub address: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<Masked<String>>,
    /// Volume below which normal-priority shipments are held back.
    pub min_capacity: Option<f64>,
}

impl Supplier {
    /// Minimum capacity with an unset threshold read as zero.
    pub fn min_capacity_or_zero(&self) -> f64 {
        self.min_capacity.unwrap_or(0.0)
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSupplier {
    pub name: String,
    pub address: String,
    pub contact_person: Option<String>,
    pub phone_number: Option<Masked<String>>,
    #[serde(default)]
    pub min_capacity: Option<f64>,
}

impl NewSupplier {
    pub fn validate(&self) -> CatalogResult<()> {
        require_text("name", &self.name)?;
        require_text("address", &self.address)?;
        if let Some(capacity) = self.min_capacity {
            require_non_negative("min_capacity", capacity)?;
        }
        Ok(())
    }

    pub fn into_supplier(self, supplier_id: SupplierId) -> Supplier {
        Supplier {
            supplier_id,
            name: self.name,
            address: self.address,
            contact_person: self.contact_person,
            phone_number: self.phone_number,
            min_capacity: self.min_capacity,
        }
    }
}

/// Partial supplier update. Only the fields listed here are writable;
/// absent or null fields keep their stored value.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupplierUpdate {
    pub name: Option<String>,
    pub address: Option<String>,
    pub contact_person: Option<String>,
    pub phone_number: Option<Masked<String>>,
    pub min_capacity: Option<f64>,
}

impl SupplierUpdate {
    /// Merges the present fields onto `supplier`. Nothing is written when
    /// validation fails.
    pub fn apply(self, supplier: &mut Supplier) -> CatalogResult<()> {
        if let Some(name) = &self.name {
            require_text("name", name)?;
        }
        if let Some(address) = &self.address {
            require_text("address", address)?;
        }
        if let Some(capacity) = self.min_capacity {
            require_non_negative("min_capacity", capacity)?;
        }

        if let Some(name) = self.name {
            supplier.name = name;
        }
        if let Some(address) = self.address {
            supplier.address = address;
        }
        if let Some(contact_person) = self.contact_person {
            supplier.contact_person = Some(contact_person);
        }
        if let Some(phone_number) = self.phone_number {
            supplier.phone_number = Some(phone_number);
        }
        if let Some(capacity) = self.min_capacity {
            supplier.min_capacity = Some(capacity);
        }
        Ok(())
    }
}
