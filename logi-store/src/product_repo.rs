use async_trait::async_trait;
use logi_catalog::{NewProduct, Product};
use logi_core::repository::{ProductRepository, RepoResult};
use logi_shared::ProductId;
use sqlx::PgPool;

use crate::rows::{ProductRow, PRODUCT_COLUMNS};

pub struct StoreProductRepository {
    pool: PgPool,
}

impl StoreProductRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductRepository for StoreProductRepository {
    async fn create_product(&self, product: NewProduct) -> RepoResult<Product> {
        let row: ProductRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO products (name, description, unit_price, quantity_available, unit_volume)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.quantity_available)
        .bind(product.unit_volume)
        .fetch_one(&self.pool)
        .await?;

        Ok(row.into())
    }

    async fn get_product(&self, id: ProductId) -> RepoResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE product_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn list_products(&self) -> RepoResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products ORDER BY product_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn list_low_stock(&self, threshold: i32) -> RepoResult<Vec<Product>> {
        let rows: Vec<ProductRow> = sqlx::query_as(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM products WHERE quantity_available < $1 ORDER BY product_id"
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_product(&self, product: &Product) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE products
            SET name = $2, description = $3, unit_price = $4, unit_volume = $5
            WHERE product_id = $1
            "#,
        )
        .bind(product.product_id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price)
        .bind(product.unit_volume)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn adjust_stock(&self, id: ProductId, amount: i32) -> RepoResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r#"
            UPDATE products
            SET quantity_available = quantity_available + $2
            WHERE product_id = $1 AND quantity_available + $2 >= 0
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(amount)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn set_stock(&self, id: ProductId, quantity: i32) -> RepoResult<Option<Product>> {
        let row: Option<ProductRow> = sqlx::query_as(&format!(
            r#"
            UPDATE products
            SET quantity_available = $2
            WHERE product_id = $1
            RETURNING {PRODUCT_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(quantity)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn delete_product(&self, id: ProductId) -> RepoResult<bool> {
        let result = sqlx::query("DELETE FROM products WHERE product_id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
