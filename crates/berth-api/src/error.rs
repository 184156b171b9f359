//! API error types

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    Unauthorized,

    #[error("Auth error: {0}")]
    Auth(#[from] berth_auth::AuthError),

    #[error("Database error: {0}")]
    Database(#[from] berth_db::DbError),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::Validation(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Unauthorized => {
                (StatusCode::UNAUTHORIZED, "invalid credentials".to_string())
            }
            // Why an auth operation failed is log-only; callers get a
            // uniform opaque message.
            ApiError::Auth(_) => (StatusCode::UNAUTHORIZED, "invalid token".to_string()),
            ApiError::Database(e) => match e {
                berth_db::DbError::Duplicate(msg) => (StatusCode::CONFLICT, msg.clone()),
                berth_db::DbError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
                _ => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
        };

        let body = axum::Json(json!({
            "status": status.as_u16(),
            "message": "error",
            "data": { "data": message },
        }));

        (status, body).into_response()
    }
}
