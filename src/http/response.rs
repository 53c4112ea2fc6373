//! Response post-processing.
//!
//! # Responsibilities
//! - Count responses per matched route and status
//! - Add security response headers
//!
//! # Design Decisions
//! - Security headers never overwrite ones a handler already set

use axum::{
    body::Body,
    extract::MatchedPath,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
    Router,
};
use tower_http::set_header::SetResponseHeaderLayer;

use crate::http::request::request_id;
use crate::observability::metrics;

/// Record the final status of every routed request.
pub async fn track_response(request: Request<Body>, next: Next) -> Response {
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());
    let id = request_id(&request).to_owned();

    let response = next.run(request).await;
    let status = response.status();

    tracing::debug!(request_id = %id, route = %route, status = status.as_u16(), "Request completed");
    metrics::record_request(&route, status.as_u16());
    response
}

/// Attach the standard hardening headers to every response.
pub fn with_security_headers<S>(router: Router<S>) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::if_not_present(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
}
