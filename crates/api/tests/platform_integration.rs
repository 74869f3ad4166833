//! Integration tests for health probes, metrics and the cross-cutting
//! middleware stack.

mod common;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use common::{parse_response_body, request, TestApp};
use suggestion_box_api::middleware::init_metrics;

#[tokio::test]
async fn test_health_reports_memory_backend() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/health", None, None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["storage"]["backend"], "memory");
    assert_eq!(body["storage"]["connected"], true);
    assert!(body["version"].is_string());
}

#[tokio::test]
async fn test_liveness_and_readiness() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/health/live", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "alive");

    let (status, body) = app.call(Method::GET, "/api/health/ready", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ready");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_request_counters() {
    init_metrics().expect("metrics recorder");
    let app = TestApp::new();
    app.call(Method::GET, "/api/health/live", None, None).await;

    let response = app.send(request(Method::GET, "/metrics", None, None)).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("http_requests_total"));
}

#[tokio::test]
async fn test_security_headers_on_every_response() {
    let app = TestApp::new();

    let response = app
        .send(request(Method::GET, "/api/health/live", None, None))
        .await;

    let headers = response.headers();
    assert_eq!(headers.get("x-content-type-options").unwrap(), "nosniff");
    assert_eq!(headers.get("x-frame-options").unwrap(), "DENY");
    assert!(headers.get(header::STRICT_TRANSPORT_SECURITY).is_none());
}

#[tokio::test]
async fn test_hsts_when_enabled() {
    let app = TestApp::with_overrides(&[("security.hsts_enabled", "true")]);

    let response = app
        .send(request(Method::GET, "/api/health/live", None, None))
        .await;

    assert!(response
        .headers()
        .get(header::STRICT_TRANSPORT_SECURITY)
        .is_some());
}

#[tokio::test]
async fn test_request_id_is_generated_or_echoed() {
    let app = TestApp::new();

    let response = app
        .send(request(Method::GET, "/api/health/live", None, None))
        .await;
    let generated = response.headers().get("x-request-id").unwrap();
    assert!(uuid::Uuid::parse_str(generated.to_str().unwrap()).is_ok());

    let response = app
        .send(
            Request::builder()
                .uri("/api/health/live")
                .header("x-request-id", "client-trace-42")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(
        response.headers().get("x-request-id").unwrap(),
        "client-trace-42"
    );
}

#[tokio::test]
async fn test_invalid_token_is_rejected_before_handlers() {
    let app = TestApp::new();

    let (status, body) = app
        .call(Method::GET, "/api/v1/groups", Some("not-a-jwt"), None)
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");

    let response = app
        .send(
            Request::builder()
                .uri("/api/v1/groups")
                .header(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = parse_response_body(response).await;
    assert_eq!(body["message"], "Invalid Authorization header format");
}

#[tokio::test]
async fn test_token_signed_with_other_secret_is_rejected() {
    let app = TestApp::new();
    let forged = shared::identity_token::sign_with_secret(
        "some_other_secret_that_is_long_enough",
        &shared::identity_token::IdentityClaims::for_subject("ext_forged", 300),
    )
    .unwrap();

    let (status, _) = app
        .call(Method::GET, "/api/v1/users/me", Some(&forged), None)
        .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_anonymous_request_reaches_engine_as_unauthenticated() {
    let app = TestApp::new();

    let (status, body) = app.call(Method::GET, "/api/v1/groups", None, None).await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "unauthorized");
}

#[tokio::test]
async fn test_rate_limit_per_identity() {
    let app = TestApp::with_overrides(&[("security.rate_limit_per_minute", "3")]);
    let limited = app.register("busy_user").await;
    let other = app.register("calm_user").await;

    for _ in 0..2 {
        let (status, _) = app
            .call(Method::GET, "/api/v1/users/me", Some(&limited.token), None)
            .await;
        assert_eq!(status, StatusCode::OK);
    }

    let response = app
        .send(request(
            Method::GET,
            "/api/v1/users/me",
            Some(&limited.token),
            None,
        ))
        .await;
    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    assert!(response.headers().get(header::RETRY_AFTER).is_some());
    let body = parse_response_body(response).await;
    assert_eq!(body["error"], "rate_limited");

    let (status, _) = app
        .call(Method::GET, "/api/v1/users/me", Some(&other.token), None)
        .await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new();

    let response = app
        .send(request(Method::GET, "/api/v1/nothing-here", None, None))
        .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
