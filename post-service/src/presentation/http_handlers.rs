use axum::{Json, Router, routing::get};
use serde::Serialize;
use tower_http::services::ServeDir;

use super::{AppState, routes};

/// API routes, health check and the static mount for uploaded covers.
pub(crate) fn routes(state: AppState) -> Router {
    let uploads = state.post_service.uploads();
    let static_files = ServeDir::new(uploads.dir());
    let prefix = uploads.public_prefix().to_string();

    Router::new()
        .route("/healthz", get(health_handler))
        .merge(routes::router())
        .nest_service(&prefix, static_files)
        .with_state(state)
}

#[derive(Debug, Serialize)]
struct HealthzResponse {
    status: &'static str,
}

async fn health_handler() -> Json<HealthzResponse> {
    Json(HealthzResponse { status: "ok" })
}
