use axum::{
    extract::State,
    routing::get,
    Json, Router,
};
use chrono::{DateTime, Utc};
use logi_order::{NewOrder, Order};
use logi_shared::{OrderId, ProductId, SupplierId};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct DateRangeQuery {
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_orders).post(place_order))
        .route("/orders/date-range", get(orders_between))
        .route("/orders/product/{id}", get(orders_for_product))
        .route("/orders/supplier/{id}", get(orders_for_supplier))
        .route("/orders/{id}", get(get_order).delete(cancel_order))
}

/// POST /orders
/// Places an order and reserves its stock.
async fn place_order(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewOrder>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.place_order(req).await?))
}

async fn list_orders(State(state): State<AppState>) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.list_orders().await?))
}

/// GET /orders/{id}
async fn get_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<OrderId>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.get_order(id).await?))
}

/// DELETE /orders/{id}
/// Cancels the order and returns its quantity to stock. Answers with the removed order.
async fn cancel_order(
    State(state): State<AppState>,
    AppPath(id): AppPath<OrderId>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.cancel_order(id).await?))
}

/// GET /orders/date-range?start_date=..&end_date=..
async fn orders_between(
    State(state): State<AppState>,
    AppQuery(range): AppQuery<DateRangeQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.orders_between(range.start_date, range.end_date).await?))
}

async fn orders_for_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.orders_for_product(id).await?))
}

async fn orders_for_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<SupplierId>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.orders_for_supplier(id).await?))
}
