use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use logi_catalog::{NewProduct, Product, ProductUpdate};
use logi_shared::ProductId;
use serde::Deserialize;

use crate::error::AppError;
use crate::extract::{AppJson, AppPath, AppQuery};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LowStockQuery {
    pub threshold: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct AdjustStockQuery {
    pub amount: i32,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/products", get(list_products).post(create_product))
        .route("/products/low-stock", get(low_stock))
        .route(
            "/products/{id}",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/products/{id}/adjust-stock", put(adjust_stock))
}

/// POST /products
async fn create_product(
    State(state): State<AppState>,
    AppJson(req): AppJson<NewProduct>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.create_product(req).await?))
}

/// GET /products
async fn list_products(State(state): State<AppState>) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.list_products().await?))
}

/// GET /products/low-stock?threshold=N
async fn low_stock(
    State(state): State<AppState>,
    AppQuery(query): AppQuery<LowStockQuery>,
) -> Result<Json<Vec<Product>>, AppError> {
    Ok(Json(state.catalog.low_stock(query.threshold).await?))
}

/// GET /products/{id}
async fn get_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.get_product(id).await?))
}

/// PUT /products/{id}
async fn update_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
    AppJson(req): AppJson<ProductUpdate>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.update_product(id, req).await?))
}

/// PUT /products/{id}/adjust-stock?amount=N
async fn adjust_stock(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
    AppQuery(query): AppQuery<AdjustStockQuery>,
) -> Result<Json<Product>, AppError> {
    Ok(Json(state.catalog.adjust_stock(id, query.amount).await?))
}

/// DELETE /products/{id}
async fn delete_product(
    State(state): State<AppState>,
    AppPath(id): AppPath<ProductId>,
) -> Result<StatusCode, AppError> {
    state.catalog.delete_product(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
