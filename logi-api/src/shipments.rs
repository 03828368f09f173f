use axum::{
    extract::State,
    routing::{get, put},
    Json, Router,
};
use chrono::{DateTime, Utc};
use logi_order::{ConsolidationRequest, Order, Shipment, ShipmentUpdate};
use logi_shared::{OrderId, ShipmentId};
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ArrivalQuery {
    pub actual_arrival_date: DateTime<Utc>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/shipments", get(list_shipments).post(create_shipment))
        .route("/shipments/delayed", get(delayed_shipments))
        .route("/shipments/on-time", get(on_time_shipments))
        .route("/shipments/order/{order_id}", get(shipments_for_order))
        .route("/shipments/{id}", get(get_shipment).put(update_shipment))
        .route("/shipments/{id}/arrival", put(record_arrival))
        .route("/shipments/{id}/orders", get(shipment_orders))
}

/// POST /shipments
/// Consolidates the requested orders into one shipment.
async fn create_shipment(
    State(state): State<AppState>,
    AppJson(req): AppJson<ConsolidationRequest>,
) -> Result<Json<Shipment>, AppError> {
    let consolidation = state.shipments.create_shipment(&req).await?;
    Ok(Json(consolidation.shipment))
}

async fn list_shipments(State(state): State<AppState>) -> Result<Json<Vec<Shipment>>, AppError> {
    Ok(Json(state.shipments.list_shipments().await?))
}

/// GET /shipments/{id}
async fn get_shipment(
    State(state): State<AppState>,
    AppPath(id): AppPath<ShipmentId>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(state.shipments.get_shipment(id).await?))
}

/// PUT /shipments/{id}
/// Only dates and status are writable after creation.
async fn update_shipment(
    State(state): State<AppState>,
    AppPath(id): AppPath<ShipmentId>,
    AppJson(req): AppJson<ShipmentUpdate>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(state.shipments.update_shipment(id, req).await?))
}

/// PUT /shipments/{id}/arrival?actual_arrival_date=..
async fn record_arrival(
    State(state): State<AppState>,
    AppPath(id): AppPath<ShipmentId>,
    AppQuery(query): AppQuery<ArrivalQuery>,
) -> Result<Json<Shipment>, AppError> {
    Ok(Json(state.shipments.record_arrival(id, query.actual_arrival_date).await?))
}

async fn delayed_shipments(State(state): State<AppState>) -> Result<Json<Vec<Shipment>>, AppError> {
    Ok(Json(state.shipments.delayed_shipments(Utc::now()).await?))
}

async fn on_time_shipments(State(state): State<AppState>) -> Result<Json<Vec<Shipment>>, AppError> {
    Ok(Json(state.shipments.on_time_shipments().await?))
}

async fn shipments_for_order(
    State(state): State<AppState>,
    AppPath(order_id): AppPath<OrderId>,
) -> Result<Json<Vec<Shipment>>, AppError> {
    Ok(Json(state.shipments.shipments_for_order(order_id).await?))
}

async fn shipment_orders(
    State(state): State<AppState>,
    AppPath(id): AppPath<ShipmentId>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.orders.orders_for_shipment(id).await?))
}
