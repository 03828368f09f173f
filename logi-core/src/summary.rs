use chrono::{DateTime, Utc};
use logi_catalog::inventory;
use logi_order::tracking;
use serde::Serialize;

use crate::repository::Repositories;
use crate::CoreResult;

/// Headline numbers for the dashboard.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct DashboardSummary {
    pub products: usize,
    pub orders: usize,
    pub shipments: usize,
    pub suppliers: usize,
    pub active_shipments: usize,
    pub delayed_shipments: usize,
    pub low_stock_products: usize,
}

pub async fn summarize(
    repos: &Repositories,
    low_stock_threshold: i32,
    now: DateTime<Utc>,
) -> CoreResult<DashboardSummary> {
    let products = repos.products.list_products().await?;
    let orders = repos.orders.list_orders().await?;
    let shipments = repos.shipments.list_shipments().await?;
    let suppliers = repos.suppliers.list_suppliers().await?;

    Ok(DashboardSummary {
        products: products.len(),
        orders: orders.len(),
        shipments: shipments.len(),
        suppliers: suppliers.len(),
        active_shipments: shipments.iter().filter(|s| tracking::is_active(s)).count(),
        delayed_shipments: shipments.iter().filter(|s| tracking::is_delayed(s, now)).count(),
        low_stock_products: products
            .iter()
            .filter(|p| inventory::is_low_stock(p, low_stock_threshold))
            .count(),
    })
}
