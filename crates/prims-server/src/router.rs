use std::sync::Arc;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use prims_dispatch::OperationRegistry;
use tower_http::trace::TraceLayer;

use crate::handler;

/// Build the axum router with all prims endpoints.
pub fn build_router(registry: Arc<OperationRegistry>, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/v1/health", get(handler::health_handler))
        .route("/v1/info", get(handler::info_handler))
        .route("/v1/operations", get(handler::operations_handler))
        .route("/v1/ops/:name", post(handler::operation_handler))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(registry)
}
