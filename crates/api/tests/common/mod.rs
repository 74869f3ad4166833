//! Common test utilities for integration tests.
//!
//! Every test builds the full router over a fresh `MemoryStore` and
//! `MemoryBlobStore`, and authenticates with HS256 tokens signed with the
//! test secret from `Config::load_for_test`.

#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    response::Response,
    Router,
};
use domain::blob::MemoryBlobStore;
use domain::store::MemoryStore;
use domain::SuggestionBox;
use fake::faker::internet::en::FreeEmail;
use fake::faker::name::en::Name;
use fake::Fake;
use serde_json::{json, Value};
use shared::identity_token::{sign_with_secret, IdentityClaims};
use suggestion_box_api::{app::create_app, config::Config};
use tower::ServiceExt;

pub const TEST_SECRET: &str = "test_secret_key_for_identity_tokens_12345";

/// A router plus handles on its backing stores.
pub struct TestApp {
    pub router: Router,
    pub store: MemoryStore,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestApp {
    pub fn new() -> Self {
        Self::with_overrides(&[])
    }

    pub fn with_overrides(overrides: &[(&str, &str)]) -> Self {
        let config = Config::load_for_test(overrides).expect("test config");
        let store = MemoryStore::new();
        let blobs = Arc::new(MemoryBlobStore::new());
        let engine = SuggestionBox::new(Arc::new(store.clone()), blobs.clone());
        let router = create_app(config, engine).expect("test app");
        Self {
            router,
            store,
            blobs,
        }
    }

    pub async fn send(&self, request: Request<Body>) -> Response {
        self.router.clone().oneshot(request).await.unwrap()
    }

    /// Sends a request and returns its status with the parsed JSON body.
    pub async fn call(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.send(request(method, uri, token, body)).await;
        let status = response.status();
        (status, parse_response_body(response).await)
    }

    /// Registers a user with a fake profile and returns their bearer token.
    pub async fn register(&self, username: &str) -> TestUser {
        let external_id = format!("ext_{}_{}", username, uuid::Uuid::new_v4().simple());
        let token = token_for(&external_id);
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/users",
                Some(&token),
                Some(json!({
                    "username": username,
                    "fullname": Name().fake::<String>(),
                    "email": format!("{}.{}", username, FreeEmail().fake::<String>()),
                })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "register failed: {}", body);
        TestUser {
            id: body["id"].as_str().unwrap().to_string(),
            external_id,
            token,
        }
    }

    /// Creates a group owned by `owner` and returns `(id, invitation_code)`.
    pub async fn create_group(&self, owner: &TestUser, name: &str) -> (String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/groups",
                Some(&owner.token),
                Some(json!({ "group_name": name, "status": "open" })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create group failed: {}", body);
        (
            body["id"].as_str().unwrap().to_string(),
            body["invitation_code"].as_str().unwrap().to_string(),
        )
    }

    /// Creates a suggestion and returns `(id, invitation_code)`.
    pub async fn create_suggestion(
        &self,
        author: &TestUser,
        group_id: &str,
        title: &str,
    ) -> (String, String) {
        let (status, body) = self
            .call(
                Method::POST,
                "/api/v1/suggestions",
                Some(&author.token),
                Some(json!({
                    "group_id": group_id,
                    "title": title,
                    "description": "Test suggestion",
                    "end_goal": 50,
                    "status": "open",
                })),
            )
            .await;
        assert_eq!(
            status,
            StatusCode::CREATED,
            "create suggestion failed: {}",
            body
        );
        (
            body["id"].as_str().unwrap().to_string(),
            body["invitation_code"].as_str().unwrap().to_string(),
        )
    }
}

/// A registered test user.
#[derive(Debug, Clone)]
pub struct TestUser {
    pub id: String,
    pub external_id: String,
    pub token: String,
}

/// Signs a token for `subject` with the test secret.
pub fn token_for(subject: &str) -> String {
    sign_with_secret(TEST_SECRET, &IdentityClaims::for_subject(subject, 3600)).unwrap()
}

pub fn request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::to_string(&body).unwrap()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

pub async fn parse_response_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap_or(Value::Null)
}
