use async_trait::async_trait;
use chrono::{DateTime, Utc};
use logi_core::repository::{CancelOutcome, OrderRepository, RepoResult};
use logi_order::{shipment_status, Order, OrderDraft, OrderStatus};
use logi_shared::{OrderId, ProductId, ShipmentId, SupplierId};
use sqlx::PgPool;
use tracing::debug;

use crate::rows::{orders_from_rows, OrderRow, ORDER_COLUMNS};

pub struct StoreOrderRepository {
    pool: PgPool,
}

impl StoreOrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_where(&self, clause: &str, id: i64) -> RepoResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE {clause} ORDER BY order_id"
        ))
        .bind(id)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders_from_rows(rows)?)
    }
}

#[async_trait]
impl OrderRepository for StoreOrderRepository {
    async fn place_order(&self, order: OrderDraft) -> RepoResult<Option<Order>> {
        let mut tx = self.pool.begin().await?;

        // Conditional decrement: concurrent orders cannot both pass the stock check
        let reserved = sqlx::query(
            r#"
            UPDATE products
            SET quantity_available = quantity_available - $2
            WHERE product_id = $1 AND quantity_available >= $2
            "#,
        )
        .bind(order.product_id)
        .bind(order.quantity_ordered)
        .execute(&mut *tx)
        .await?;

        if reserved.rows_affected() == 0 {
            debug!(product_id = order.product_id, "Stock reservation failed");
            return Ok(None);
        }

        let row: OrderRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO orders (product_id, supplier_id, order_date, quantity_ordered, total_volume, status)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {ORDER_COLUMNS}
            "#
        ))
        .bind(order.product_id)
        .bind(order.supplier_id)
        .bind(order.order_date)
        .bind(order.quantity_ordered)
        .bind(order.total_volume)
        .bind(OrderStatus::Pending.as_str())
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(Some(Order::try_from(row)?))
    }

    async fn get_order(&self, id: OrderId) -> RepoResult<Option<Order>> {
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Order::try_from).transpose()?)
    }

    async fn list_orders(&self) -> RepoResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders ORDER BY order_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(orders_from_rows(rows)?)
    }

    async fn list_orders_for_supplier(&self, supplier_id: SupplierId) -> RepoResult<Vec<Order>> {
        self.fetch_where("supplier_id = $1", supplier_id).await
    }

    async fn list_orders_for_product(&self, product_id: ProductId) -> RepoResult<Vec<Order>> {
        self.fetch_where("product_id = $1", product_id).await
    }

    async fn list_orders_between(
        &self,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> RepoResult<Vec<Order>> {
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_date BETWEEN $1 AND $2 ORDER BY order_id"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        Ok(orders_from_rows(rows)?)
    }

    async fn list_orders_for_shipment(&self, shipment_id: ShipmentId) -> RepoResult<Vec<Order>> {
        self.fetch_where("shipment_id = $1", shipment_id).await
    }

    async fn cancel_order(&self, id: OrderId) -> RepoResult<CancelOutcome> {
        let mut tx = self.pool.begin().await?;

        let linked: Option<(Option<ShipmentId>,)> =
            sqlx::query_as("SELECT shipment_id FROM orders WHERE order_id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let Some((linked,)) = linked else {
            return Ok(CancelOutcome::NotFound);
        };

        // Locked so a concurrent status change waits for this transaction
        let statuses: Vec<(String,)> = sqlx::query_as(
            "SELECT status FROM shipments WHERE order_id = $1 OR shipment_id = $2 FOR UPDATE",
        )
        .bind(id)
        .bind(linked)
        .fetch_all(&mut *tx)
        .await?;
        if statuses
            .iter()
            .any(|(status,)| status == shipment_status::DELIVERED)
        {
            return Ok(CancelOutcome::Delivered);
        }

        // shipments.order_id is cleared by ON DELETE SET NULL
        let row: Option<OrderRow> = sqlx::query_as(&format!(
            "DELETE FROM orders WHERE order_id = $1 RETURNING {ORDER_COLUMNS}"
        ))
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;

        let Some(row) = row else {
            return Ok(CancelOutcome::NotFound);
        };
        let order = Order::try_from(row)?;

        sqlx::query(
            "UPDATE products SET quantity_available = quantity_available + $2 WHERE product_id = $1",
        )
        .bind(order.product_id)
        .bind(order.quantity_ordered)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(CancelOutcome::Cancelled(order))
    }
}
