//! Security headers middleware.
//!
//! Adds security-related HTTP headers to all responses.

use axum::{
    body::Body,
    extract::State,
    http::{header, HeaderValue, Request},
    middleware::Next,
    response::Response,
};

use crate::app::AppState;

/// X-Content-Type-Options header name.
pub const X_CONTENT_TYPE_OPTIONS: &str = "x-content-type-options";
/// X-Frame-Options header name.
pub const X_FRAME_OPTIONS: &str = "x-frame-options";
/// X-XSS-Protection header name.
pub const X_XSS_PROTECTION: &str = "x-xss-protection";

const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Middleware that adds security headers to all responses.
///
/// `Strict-Transport-Security` is only sent when `security.hsts_enabled` is
/// set, since it must only be served behind HTTPS termination.
pub async fn security_headers_middleware(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let mut response = next.run(req).await;
    apply_security_headers(&mut response, state.config.security.hsts_enabled);
    response
}

fn apply_security_headers(response: &mut Response, hsts_enabled: bool) {
    let headers = response.headers_mut();

    headers.insert(
        header::HeaderName::from_static(X_CONTENT_TYPE_OPTIONS),
        HeaderValue::from_static("nosniff"),
    );
    headers.insert(
        header::HeaderName::from_static(X_FRAME_OPTIONS),
        HeaderValue::from_static("DENY"),
    );
    headers.insert(
        header::HeaderName::from_static(X_XSS_PROTECTION),
        HeaderValue::from_static("1; mode=block"),
    );

    if hsts_enabled {
        headers.insert(
            header::STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(HSTS_VALUE),
        );
    }
}
