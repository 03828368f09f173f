use async_trait::async_trait;
use logi_catalog::Supplier;
use logi_core::repository::{ConsolidationUnit, RepoResult, ShipmentRepository};
use logi_order::{Order, OrderStatus, Shipment, ShipmentDraft};
use logi_shared::{OrderId, ShipmentId, SupplierId};
use sqlx::{PgPool, Postgres, Transaction};

use crate::rows::{
    orders_from_rows, shipments_from_rows, OrderRow, ShipmentRow, SupplierRow, ORDER_COLUMNS,
    SHIPMENT_COLUMNS, SUPPLIER_COLUMNS,
};

pub struct StoreShipmentRepository {
    pool: PgPool,
}

impl StoreShipmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ShipmentRepository for StoreShipmentRepository {
    async fn begin_consolidation(&self) -> RepoResult<Box<dyn ConsolidationUnit>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(StoreConsolidationUnit { tx }))
    }

    async fn get_shipment(&self, id: ShipmentId) -> RepoResult<Option<Shipment>> {
        let row: Option<ShipmentRow> = sqlx::query_as(&format!(
            "SELECT {SHIPMENT_COLUMNS} FROM shipments WHERE shipment_id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Shipment::try_from).transpose()?)
    }

    async fn list_shipments(&self) -> RepoResult<Vec<Shipment>> {
        let rows: Vec<ShipmentRow> = sqlx::query_as(&format!(
            "SELECT {SHIPMENT_COLUMNS} FROM shipments ORDER BY shipment_id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(shipments_from_rows(rows)?)
    }

    async fn update_shipment(&self, shipment: &Shipment) -> RepoResult<bool> {
        let result = sqlx::query(
            r#"
            UPDATE shipments
            SET shipment_date = $2, estimated_arrival_date = $3, status = $4, actual_arrival_date = $5
            WHERE shipment_id = $1
            "#,
        )
        .bind(shipment.shipment_id)
        .bind(shipment.shipment_date)
        .bind(shipment.estimated_arrival_date)
        .bind(&shipment.status)
        .bind(shipment.actual_arrival_date)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_shipments_for_order(&self, order_id: OrderId) -> RepoResult<Vec<Shipment>> {
        let rows: Vec<ShipmentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SHIPMENT_COLUMNS} FROM shipments
            WHERE order_id = $1
               OR shipment_id = (SELECT shipment_id FROM orders WHERE order_id = $1)
            ORDER BY shipment_id
            "#
        ))
        .bind(order_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shipments_from_rows(rows)?)
    }

    async fn list_shipments_for_supplier(&self, supplier_id: SupplierId) -> RepoResult<Vec<Shipment>> {
        let rows: Vec<ShipmentRow> = sqlx::query_as(&format!(
            r#"
            SELECT {SHIPMENT_COLUMNS} FROM shipments
            WHERE shipment_id IN (
                    SELECT shipment_id FROM orders
                    WHERE supplier_id = $1 AND shipment_id IS NOT NULL)
               OR order_id IN (SELECT order_id FROM orders WHERE supplier_id = $1)
            ORDER BY shipment_id
            "#
        ))
        .bind(supplier_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(shipments_from_rows(rows)?)
    }
}

/// A consolidation running inside one Postgres transaction. Dropping it
/// without `commit` rolls the transaction back.
pub struct StoreConsolidationUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl ConsolidationUnit for StoreConsolidationUnit {
    async fn lock_orders(&mut self, ids: &[OrderId]) -> RepoResult<Vec<Order>> {
        // Ascending id order keeps concurrent consolidations from deadlocking
        let rows: Vec<OrderRow> = sqlx::query_as(&format!(
            "SELECT {ORDER_COLUMNS} FROM orders WHERE order_id = ANY($1) ORDER BY order_id FOR UPDATE"
        ))
        .bind(ids)
        .fetch_all(&mut *self.tx)
        .await?;

        Ok(orders_from_rows(rows)?)
    }

    async fn get_supplier(&mut self, id: SupplierId) -> RepoResult<Option<Supplier>> {
        let row: Option<SupplierRow> = sqlx::query_as(&format!(
            "SELECT {SUPPLIER_COLUMNS} FROM suppliers WHERE supplier_id = $1"
        ))
        .bind(id)
        .fetch_optional(&mut *self.tx)
        .await?;

        Ok(row.map(Into::into))
    }

    async fn insert_shipment(&mut self, shipment: ShipmentDraft) -> RepoResult<Shipment> {
        let row: ShipmentRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO shipments (order_id, shipment_date, estimated_arrival_date, actual_arrival_date,
                status, priority, required_capacity, current_load, load_percentage,
                extra_charge, total_cost, cost_reason)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            RETURNING {SHIPMENT_COLUMNS}
            "#
        ))
        .bind(shipment.order_id)
        .bind(shipment.shipment_date)
        .bind(shipment.estimated_arrival_date)
        .bind(shipment.actual_arrival_date)
        .bind(&shipment.status)
        .bind(shipment.priority.as_str())
        .bind(shipment.required_capacity)
        .bind(shipment.current_load)
        .bind(shipment.load_percentage)
        .bind(shipment.extra_charge)
        .bind(shipment.total_cost)
        .bind(&shipment.cost_reason)
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(Shipment::try_from(row)?)
    }

    async fn link_order(
        &mut self,
        order_id: OrderId,
        shipment_id: ShipmentId,
        status: OrderStatus,
    ) -> RepoResult<bool> {
        let result = sqlx::query("UPDATE orders SET shipment_id = $2, status = $3 WHERE order_id = $1")
            .bind(order_id)
            .bind(shipment_id)
            .bind(status.as_str())
            .execute(&mut *self.tx)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn commit(self: Box<Self>) -> RepoResult<()> {
        let unit = *self;
        unit.tx.commit().await?;
        Ok(())
    }
}
