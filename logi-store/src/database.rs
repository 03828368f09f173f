use std::sync::Arc;
use std::time::Duration;

use logi_core::Repositories;
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres};
use tracing::info;

use crate::{StoreOrderRepository, StoreProductRepository, StoreShipmentRepository, StoreSupplierRepository};

#[derive(Clone)]
pub struct DbClient {
    pub pool: Pool<Postgres>,
}

impl DbClient {
    pub async fn new(connection_string: &str, max_connections: u32) -> Result<Self, sqlx::Error> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect(connection_string)
            .await?;

        Ok(Self { pool })
    }

    pub async fn migrate(&self) -> Result<(), sqlx::migrate::MigrateError> {
        info!("Running database migrations...");
        sqlx::migrate!("../migrations")
            .run(&self.pool)
            .await?;
        info!("Migrations completed successfully.");
        Ok(())
    }

    /// Postgres-backed implementations of every persistence port.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            suppliers: Arc::new(StoreSupplierRepository::new(self.pool.clone())),
            products: Arc::new(StoreProductRepository::new(self.pool.clone())),
            orders: Arc::new(StoreOrderRepository::new(self.pool.clone())),
            shipments: Arc::new(StoreShipmentRepository::new(self.pool.clone())),
        }
    }
}
