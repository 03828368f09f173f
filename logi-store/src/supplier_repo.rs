use async_trait::async_trait;
use logi_catalog::{NewSupplier, Supplier};
use logi_core::repository::{RepoResult, SupplierRepository};
use logi_shared::SupplierId;
use sqlx::PgPool;

use crate::rows::{SupplierRow, SUPPLIER_COLUMNS};

pub struct StoreSupplierRepository {
    pool: PgPool,
}

impl StoreSupplierRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SupplierRepository for StoreSupplierRepository {
    async fn create_supplier(&self, supplier: NewSupplier) -> RepoResult<Supplier> {
        let row: SupplierRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO suppliers (name, address, contact_person, phone_number, min_capacity)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {SUPPLIER_COLUMNS}
            "#
        ))
        .bind(&supplier.name)
        .bind(&supplier.address)
        .bind(&supplier.contact_person)
        .bind(supplier.phone_number.as_ref().map(|p| p.expose().as_str()))
        .bind(supplier.min_capacity)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_supplier(&self, id: SupplierId) -> RepoResult<Option<Supplier>> {
        let row: Option<SupplierRow> = sqlx::query_as(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE supplier_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_suppliers(&self) -> RepoResult<Vec<Supplier>> {
        let rows: Vec<SupplierRow> = sqlx::query_as(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers ORDER BY supplier_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_supplier(&self, supplier: &Supplier) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE suppliers
            SET name = $2, address = $3, contact_person = $4, phone_number = $5, min_capacity = $6
            WHERE supplier_id = $1
            "#,
        )
        .bind(supplier.supplier_id)
        .bind(&supplier.name)
        .bind(&supplier.address)
        .bind(&supplier.contact_person)
        .bind(supplier.phone_number.as_ref().map(|p| p.expose().as_str()))
        .bind(supplier.min_capacity)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_supplier(&self, id: SupplierId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM suppliers WHERE supplier_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
