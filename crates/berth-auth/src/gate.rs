//! Bearer-token request gate
//!
//! The gate is a pure function from the raw `Authorization` header to
//! either an authenticated identity or a rejection response. Handlers
//! never run on the rejection path; the HTTP layer branches on the
//! result and writes the rejection directly.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use tracing::debug;

use crate::token::{TokenCodec, TokenKind};

/// Identity resolved from a validated token, bound into the request
/// context for downstream handlers.
#[derive(Debug, Clone)]
pub struct Identity {
    pub subject: String,
}

/// Rejection emitted by the gate.
///
/// A bad header shape and a bad token get distinct bodies; why a token
/// failed validation (expired vs. malformed) is never exposed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GateRejection {
    InvalidToken,
    TokenExpired,
}

impl GateRejection {
    pub fn message(&self) -> &'static str {
        match self {
            GateRejection::InvalidToken => "Invalid Token",
            GateRejection::TokenExpired => "Token Expired",
        }
    }
}

impl IntoResponse for GateRejection {
    fn into_response(self) -> Response {
        let body = Json(json!({
            "status": StatusCode::UNAUTHORIZED.as_u16(),
            "message": "error",
            "data": { "data": self.message() },
        }));
        (StatusCode::UNAUTHORIZED, body).into_response()
    }
}

/// Check a bearer header against the codec for the expected token kind.
///
/// The header must be exactly the literal scheme prefix `"Bearer "`
/// followed by one token; a missing header, a different scheme, or
/// extra segments all reject with `InvalidToken`.
pub fn check_bearer(
    header: Option<&str>,
    codec: &TokenCodec,
    kind: TokenKind,
) -> Result<Identity, GateRejection> {
    let header = header.ok_or(GateRejection::InvalidToken)?;
    let token = header
        .strip_prefix("Bearer ")
        .ok_or(GateRejection::InvalidToken)?;
    if token.is_empty() || token.contains(char::is_whitespace) {
        return Err(GateRejection::InvalidToken);
    }

    match codec.validate(token, kind) {
        Ok(subject) => Ok(Identity { subject }),
        Err(e) => {
            debug!("Bearer token rejected ({} gate): {}", kind.as_str(), e);
            Err(GateRejection::TokenExpired)
        }
    }
}
