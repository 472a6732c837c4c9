//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Router<()> {
    let body_limit = state.config.max_upload_size_bytes;

    Router::new()
        .route(
            "/",
            get(handlers::upload::index).post(handlers::upload::submit),
        )
        .route("/download_all", get(handlers::download::download_all))
        .route(
            "/download_all_curriculos",
            get(handlers::download::download_all),
        )
        .route("/health", get(handlers::health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
