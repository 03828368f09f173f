use axum::{
    extract::State,
    http::StatusCode,
    routing::get,
    Json, Router,
};
use logi_catalog::{NewSupplier, Supplier, SupplierUpdate};
use logi_order::{Order, Shipment};
use logi_shared::SupplierId;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath};
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/suppliers", get(list_suppliers).post(create_supplier))
        .route(
            "/suppliers/{id}",
            get(get_supplier).put(update_supplier).delete(delete_supplier),
        )
        .route("/suppliers/{id}/orders", get(supplier_orders))
        .route("/suppliers/{id}/shipments", get(supplier_shipments))
}

/// POST /suppliers
async fn create_supplier(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewSupplier>,
) -> Result<Json<Supplier>, AppError> {
    Ok(Json(state.catalog.create_supplier(req).await?))
}

/// GET /suppliers
async fn list_suppliers(State(state): State<AppState>) -> Result<Json<Vec<Supplier>>, AppError> {
    Ok(Json(state.catalog.list_suppliers().await?))
}

/// GET /suppliers/{id}
async fn get_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<SupplierId>,
) -> Result<Json<Supplier>, AppError> {
    Ok(Json(state.catalog.get_supplier(id).await?))
}

/// PUT /suppliers/{id}
async fn update_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<SupplierId>,
    AppJson(req): AppJson<SupplierUpdate>,
) -> Result<Json<Supplier>, AppError> {
    Ok(Json(state.catalog.update_supplier(id, req).await?))
}

/// DELETE /suppliers/{id}
async fn delete_supplier(
    State(state): State<AppState>,
    AppPath(id): AppPath<SupplierId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_supplier(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn supplier_orders(
    State(state): State<AppState>,
    AppPath(id): AppPath<SupplierId>,
) -> Result<Json<Vec<Order>>, AppError> {
    Ok(Json(state.catalog.supplier_orders(id).await?))
}

async fn supplier_shipments(
    State(state): State<AppState>,
    AppPath(id): AppPath<SupplierId>,
) -> Result<Json<Vec<Shipment>>, AppError> {
    Ok(Json(state.catalog.supplier_shipments(id).await?))
}
