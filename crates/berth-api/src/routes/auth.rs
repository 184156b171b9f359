//! Authentication gates and the login/refresh routes

use axum::{
    Json, Router,
    extract::{FromRef, FromRequestParts, State},
    http::{HeaderMap, header::AUTHORIZATION, header::USER_AGENT, request::Parts},
    routing::post,
};
use berth_auth::{GateRejection, Identity, TokenKind, check_bearer, verify_password};
use berth_db::NewSession;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::{LoginRequest, TokenPairResponse};

// ==================== Gate Extractors ====================

/// Access gate: protects mutation endpoints.
///
/// Rejection is the extractor's error path, so a denied request never
/// reaches the wrapped handler.
pub struct RequireAccess(pub Identity);

impl<S> FromRequestParts<S> for RequireAccess
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let identity = check_bearer(header, &app_state.codec, TokenKind::Access)?;

        debug!("Access gate passed for {}", identity.subject);
        Ok(RequireAccess(identity))
    }
}

/// Refresh gate: used only on the refresh endpoint.
pub struct RequireRefresh(pub Identity);

impl<S> FromRequestParts<S> for RequireRefresh
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = GateRejection;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let app_state = AppState::from_ref(state);
        let header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok());
        let identity = check_bearer(header, &app_state.codec, TokenKind::Refresh)?;

        debug!("Refresh gate passed for {}", identity.subject);
        Ok(RequireRefresh(identity))
    }
}

/// Raw bearer token, for handlers that need the token string itself.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
}

fn user_agent(headers: &HeaderMap) -> String {
    headers
        .get(USER_AGENT)
        .and_then(|h| h.to_str().ok())
        .unwrap_or_default()
        .to_string()
}

// ==================== Auth Routes ====================

/// Valid scrypt hash that never matches; verified when the email is
/// unknown so both login paths cost exactly one scrypt pass.
const DUMMY_HASH: &str = "$scrypt$ln=15,r=16,p=1$dGltaW5nX2F0dGFja19wcmV2ZW50aW9u$YF62NDdUWIr7Cp+GncYfBrH40EmhWgFo0nvFJLR6j/Y";

/// POST /api/v1/accounts/login
async fn login(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(request): Json<LoginRequest>,
) -> Result<Json<TokenPairResponse>, ApiError> {
    debug!("Login attempt for {}", request.email);

    let account_result = state.db.get_account_by_email(&request.email).await?;

    // Always run exactly one verification so an unknown email costs the
    // same as a wrong password.
    let (hash_to_verify, account) = match account_result {
        Some(a) => (a.password_hash.clone(), Some(a)),
        None => (DUMMY_HASH.to_string(), None),
    };

    let password_valid = verify_password(&request.password, &state.pepper, &hash_to_verify);

    let account = match (account, password_valid) {
        (Some(a), true) => a,
        _ => return Err(ApiError::Unauthorized),
    };

    let access_token = state.codec.issue(&account.email, TokenKind::Access)?;
    let refresh_token = state.codec.issue(&account.email, TokenKind::Refresh)?;

    state
        .db
        .create_session(NewSession {
            account_id: account.id,
            access_token: access_token.clone(),
            refresh_token: refresh_token.clone(),
            user_agent: user_agent(&headers),
        })
        .await?;

    info!("Account {} logged in", account.email);

    Ok(Json(TokenPairResponse {
        details: account.into(),
        access_token,
        refresh_token,
    }))
}

/// POST /api/v1/accounts/refresh
///
/// The refresh gate has already validated the presented token; the
/// handler binds it back to its session row and replaces the access
/// token in place. The refresh token itself is returned unchanged.
async fn refresh(
    RequireRefresh(identity): RequireRefresh,
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<TokenPairResponse>, ApiError> {
    let account = state
        .db
        .get_account_by_email(&identity.subject)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("account {} not found", identity.subject)))?;

    // The gate guarantees the header parses; an empty token cannot reach here.
    let refresh_token = bearer_token(&headers).unwrap_or_default();

    let session = state
        .db
        .get_session_by_refresh_token(refresh_token)
        .await?
        .ok_or_else(|| ApiError::NotFound("session not found".to_string()))?;

    let access_token = state.codec.issue(&account.email, TokenKind::Access)?;

    // A concurrent logout/cleanup can remove the row between lookup and
    // update; that surfaces as 404, never as a silently stale session.
    state.db.replace_access_token(session.id, &access_token).await?;

    info!("Access token refreshed for {}", account.email);

    Ok(Json(TokenPairResponse {
        details: account.into(),
        access_token,
        refresh_token: session.refresh_token,
    }))
}

/// Create auth routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/accounts/login", post(login))
        .route("/api/v1/accounts/refresh", post(refresh))
}
