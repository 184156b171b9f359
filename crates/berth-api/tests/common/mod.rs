//! Shared helpers for the HTTP-level integration tests.
//!
//! Requests are sent straight to the router via tower::ServiceExt,
//! without a TCP listener, against an in-memory database.

#![allow(dead_code)]

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use axum::http::{Method, Request};
use axum::response::Response;
use http_body_util::BodyExt;
use tower::ServiceExt;

use berth_api::{AppState, create_router};
use berth_auth::TokenCodec;
use berth_db::Database;
use berth_notify::Notifier;

/// Key the test app and the test-side codec share.
pub const TEST_KEY_HEX: &str =
    "0123456789abcdef0123456789abcdef0123456789abcdef0123456789abcdef";
pub const TEST_PEPPER: &str = "integration-test-pepper";
pub const TEST_USER_AGENT: &str = "berth-tests/1.0";

/// Notifier double with a fixed delivery outcome.
pub struct StaticNotifier(pub bool);

#[async_trait]
impl Notifier for StaticNotifier {
    async fn send(&self, _to: &str, _subject: &str) -> bool {
        self.0
    }
}

/// Codec configured with the same key as the test app, for minting
/// tokens (including expired ones) outside the login flow.
pub fn test_codec() -> TokenCodec {
    TokenCodec::from_hex(TEST_KEY_HEX).unwrap()
}

/// Build the application router against a fresh in-memory database.
pub async fn build_test_app() -> Router {
    build_test_app_with_delivery(true).await
}

/// Same, with a chosen email delivery outcome.
pub async fn build_test_app_with_delivery(delivery_ok: bool) -> Router {
    let db = Database::new_in_memory().await.unwrap();
    let codec = Arc::new(test_codec());
    let state = AppState::new(
        db,
        codec,
        Arc::new(StaticNotifier(delivery_ok)),
        TEST_PEPPER.to_string(),
    );
    create_router(state)
}

pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::GET)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(USER_AGENT, TEST_USER_AGENT)
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(CONTENT_TYPE, "application/json")
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::from(body.to_string()))
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response {
    let request = Request::builder()
        .method(Method::DELETE)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

/// Register an account through the API and return its JSON body.
pub async fn register_account(app: Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({
        "name": "Test Account",
        "email": email,
        "company": "Acme",
        "password": password,
    });
    let response = post_json(app, "/api/v1/accounts/register", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::CREATED);
    body_json(response).await
}

/// Log in through the API and return the token-pair JSON body.
pub async fn login(app: Router, email: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "email": email, "password": password });
    let response = post_json(app, "/api/v1/accounts/login", body).await;
    assert_eq!(response.status(), axum::http::StatusCode::OK);
    body_json(response).await
}
