//! Router configuration for the web API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use super::handlers::{get_script, index, list_scripts, upload_script, AppState};
use super::middleware::create_cors_layer;

/// Create the main router.
///
/// `max_upload_bytes` caps the request body of `/upload`; `None` lifts the cap.
pub fn create_router(
    app_state: Arc<AppState>,
    cors_origins: &[String],
    max_upload_bytes: Option<usize>,
) -> Router {
    let body_limit = match max_upload_bytes {
        Some(limit) => DefaultBodyLimit::max(limit),
        None => DefaultBodyLimit::disable(),
    };

    let upload_routes = Router::new()
        .route("/upload", post(upload_script))
        .layer(body_limit);

    Router::new()
        .route("/", get(index))
        .route("/scripts", get(list_scripts))
        .route("/scripts/:filename", get(get_script))
        .merge(upload_routes)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(create_cors_layer(cors_origins)),
        )
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}
