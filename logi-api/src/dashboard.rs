use axum::{extract::State, routing::get, Json, Router};
use chrono::Utc;
use logi_core::{summarize, DashboardSummary};

use crate::error::AppError;
use crate::state::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(root))
        .route("/dashboard/summary", get(summary))
}

/// GET /
/// Liveness
async fn root() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "message": "Logistics Management System API" }))
}

/// GET /dashboard/summary
async fn summary(State(state): State<AppState>) -> Result<Json<DashboardSummary>, AppError> {
    let summary = summarize(
        &state.repos,
        state.business_rules.low_stock_threshold,
        Utc::now(),
    )
    .await?;
    Ok(Json(summary))
}
