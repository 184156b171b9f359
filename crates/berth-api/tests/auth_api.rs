//! HTTP-level integration tests for login, refresh, and the bearer gates.

mod common;

use axum::http::StatusCode;
use berth_auth::TokenKind;
use common::{
    body_json, build_test_app, delete, delete_auth, login, post_auth, register_account, test_codec,
};

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_login_returns_token_pair() {
    let app = build_test_app().await;

    register_account(app.clone(), "a@x.com", "correct horse").await;
    let json = login(app, "a@x.com", "correct horse").await;

    assert_eq!(json["details"]["email"], "a@x.com");
    assert!(!json["access_token"].as_str().unwrap().is_empty());
    assert!(!json["refresh_token"].as_str().unwrap().is_empty());
    assert_ne!(json["access_token"], json["refresh_token"]);
}

#[tokio::test]
async fn test_login_wrong_password_returns_401() {
    let app = build_test_app().await;

    register_account(app.clone(), "a@x.com", "correct horse").await;

    let body = serde_json::json!({ "email": "a@x.com", "password": "battery staple" });
    let response = common::post_json(app, "/api/v1/accounts/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["message"], "error");
    assert_eq!(json["data"]["data"], "invalid credentials");
}

#[tokio::test]
async fn test_login_unknown_email_returns_401() {
    let app = build_test_app().await;

    let body = serde_json::json!({ "email": "nobody@x.com", "password": "correct horse" });
    let response = common::post_json(app, "/api/v1/accounts/login", body).await;

    // Unknown account and wrong password are indistinguishable to the caller.
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["data"], "invalid credentials");
}

// ---------------------------------------------------------------------------
// Access gate
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_delete_without_authorization_returns_invalid_token() {
    let app = build_test_app().await;

    let created = register_account(app.clone(), "a@x.com", "correct horse").await;
    let id = created["id"].as_i64().unwrap();

    let response = delete(app, &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], 401);
    assert_eq!(json["message"], "error");
    assert_eq!(json["data"]["data"], "Invalid Token");
}

#[tokio::test]
async fn test_delete_with_garbage_token_returns_token_expired() {
    let app = build_test_app().await;

    let created = register_account(app.clone(), "a@x.com", "correct horse").await;
    let id = created["id"].as_i64().unwrap();

    let response = delete_auth(app, &format!("/api/v1/accounts/{id}"), "not-a-paseto").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["data"], "Token Expired");
}

#[tokio::test]
async fn test_delete_with_refresh_token_is_rejected() {
    let app = build_test_app().await;

    let created = register_account(app.clone(), "a@x.com", "correct horse").await;
    let id = created["id"].as_i64().unwrap();
    let tokens = login(app.clone(), "a@x.com", "correct horse").await;
    let refresh = tokens["refresh_token"].as_str().unwrap();

    // A refresh token must not pass the access gate.
    let response = delete_auth(app, &format!("/api/v1/accounts/{id}"), refresh).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["data"], "Token Expired");
}

#[tokio::test]
async fn test_delete_with_access_token_succeeds() {
    let app = build_test_app().await;

    let created = register_account(app.clone(), "a@x.com", "correct horse").await;
    let id = created["id"].as_i64().unwrap();
    let tokens = login(app.clone(), "a@x.com", "correct horse").await;
    let access = tokens["access_token"].as_str().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/accounts/{id}"), access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = common::get(app, &format!("/api/v1/accounts/{id}")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

// ---------------------------------------------------------------------------
// Refresh
// ---------------------------------------------------------------------------

#[tokio::test]
async fn test_refresh_replaces_access_token_and_keeps_refresh_token() {
    let app = build_test_app().await;

    register_account(app.clone(), "a@x.com", "correct horse").await;
    let tokens = login(app.clone(), "a@x.com", "correct horse").await;
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let response = post_auth(app.clone(), "/api/v1/accounts/refresh", refresh).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;

    let new_access = json["access_token"].as_str().unwrap();
    assert!(!new_access.is_empty());
    assert_eq!(json["refresh_token"].as_str().unwrap(), refresh);

    // The replacement access token passes the access gate.
    let id = json["details"]["id"].as_i64().unwrap();
    let response = delete_auth(app, &format!("/api/v1/accounts/{id}"), new_access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_refresh_with_expired_token_returns_token_expired() {
    let app = build_test_app().await;

    register_account(app.clone(), "a@x.com", "correct horse").await;
    let expired = test_codec()
        .issue_with_ttl("a@x.com", TokenKind::Refresh, chrono::Duration::seconds(-5))
        .unwrap();

    let response = post_auth(app, "/api/v1/accounts/refresh", &expired).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["status"], 401);
    assert_eq!(json["data"]["data"], "Token Expired");
}

#[tokio::test]
async fn test_refresh_with_access_token_is_rejected() {
    let app = build_test_app().await;

    register_account(app.clone(), "a@x.com", "correct horse").await;
    let tokens = login(app.clone(), "a@x.com", "correct horse").await;
    let access = tokens["access_token"].as_str().unwrap();

    let response = post_auth(app, "/api/v1/accounts/refresh", access).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["data"]["data"], "Token Expired");
}

#[tokio::test]
async fn test_refresh_without_session_returns_404() {
    let app = build_test_app().await;

    register_account(app.clone(), "a@x.com", "correct horse").await;

    // Valid token, but no login ever happened so no session row exists.
    let orphan = test_codec()
        .issue("a@x.com", TokenKind::Refresh)
        .unwrap();

    let response = post_auth(app, "/api/v1/accounts/refresh", &orphan).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_refresh_for_deleted_account_returns_404() {
    let app = build_test_app().await;

    let created = register_account(app.clone(), "a@x.com", "correct horse").await;
    let id = created["id"].as_i64().unwrap();
    let tokens = login(app.clone(), "a@x.com", "correct horse").await;
    let access = tokens["access_token"].as_str().unwrap();
    let refresh = tokens["refresh_token"].as_str().unwrap();

    let response = delete_auth(app.clone(), &format!("/api/v1/accounts/{id}"), access).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let response = post_auth(app, "/api/v1/accounts/refresh", refresh).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
