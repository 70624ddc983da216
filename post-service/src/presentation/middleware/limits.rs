use std::time::Duration;

use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::http::StatusCode;
use tower::limit::GlobalConcurrencyLimitLayer;
use tower_http::timeout::TimeoutLayer;

/// Caps applied to every HTTP request.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RequestLimits {
    /// Also bounds multipart uploads.
    pub(crate) body_limit_bytes: usize,
    pub(crate) concurrency: usize,
    pub(crate) timeout: Duration,
}

/// Slow requests get `408`, oversized bodies `413`. Requests over the
/// concurrency cap wait for a free slot.
pub(crate) fn apply_limits(router: Router, limits: RequestLimits) -> Router {
    router
        .layer(DefaultBodyLimit::max(limits.body_limit_bytes))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            limits.timeout,
        ))
        .layer(GlobalConcurrencyLimitLayer::new(limits.concurrency))
}
