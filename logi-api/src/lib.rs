use axum::{http::Method, Router};
use tower_http::cors::CorsLayer;
use tower_http::request_id::{PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;

pub mod dashboard;
pub mod error;
pub mod events;
pub mod extract;
pub mod middleware;
pub mod orders;
pub mod products;
pub mod shipments;
pub mod state;
pub mod suppliers;

pub use state::AppState;

pub fn app(state: AppState) -> Router {
    // CORS Middleware
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            axum::http::header::CONTENT_TYPE,
            axum::http::header::USER_AGENT,
        ]);

    Router::new()
        .merge(dashboard::routes())
        .merge(suppliers::routes())
        .merge(products::routes())
        .merge(orders::routes())
        .merge(shipments::routes())
        .merge(events::routes())
        .layer(cors)
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(TraceLayer::new_for_http())
        .layer(SetRequestIdLayer::x_request_id(middleware::MakeRequestUuid))
        .with_state(state)
}
