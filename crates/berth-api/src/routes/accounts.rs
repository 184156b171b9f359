//! Account management routes

use std::str::FromStr;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
};
use berth_auth::hash_password;
use berth_db::{AccountRole, NewAccount};
use tracing::{debug, info, warn};

use crate::error::ApiError;
use crate::state::AppState;

use super::auth::RequireAccess;
use super::types::{AccountResponse, RegisterRequest};

// ==================== Input Validation ====================

/// Maximum allowed email length
const MAX_EMAIL_LENGTH: usize = 254;
/// Maximum allowed password length (prevent DoS with very large passwords)
const MAX_PASSWORD_LENGTH: usize = 256;
/// Minimum allowed password length
const MIN_PASSWORD_LENGTH: usize = 8;

fn validate_email(email: &str) -> Result<(), ApiError> {
    if email.is_empty() {
        return Err(ApiError::Validation("Email cannot be empty".to_string()));
    }
    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ApiError::Validation(format!(
            "Email exceeds maximum length of {} characters",
            MAX_EMAIL_LENGTH
        )));
    }
    if !email.contains('@') {
        return Err(ApiError::Validation("Email is not valid".to_string()));
    }
    Ok(())
}

fn validate_password(password: &str) -> Result<(), ApiError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password must be at least {} characters long",
            MIN_PASSWORD_LENGTH
        )));
    }
    if password.len() > MAX_PASSWORD_LENGTH {
        return Err(ApiError::Validation(format!(
            "Password exceeds maximum length of {} characters",
            MAX_PASSWORD_LENGTH
        )));
    }
    Ok(())
}

/// Parse an external id into a typed one; never proceed on a bad id.
fn parse_account_id(raw: &str) -> Result<i64, ApiError> {
    raw.parse::<i64>()
        .map_err(|_| ApiError::Validation(format!("invalid account id: {}", raw)))
}

// ==================== Registration ====================

/// Shared registration path for both public register and admin create.
async fn register_account(
    state: &AppState,
    request: RegisterRequest,
    role: AccountRole,
) -> Result<AccountResponse, ApiError> {
    validate_email(&request.email)?;
    validate_password(&request.password)?;
    if request.name.is_empty() {
        return Err(ApiError::Validation("Name cannot be empty".to_string()));
    }

    // Privileged roles are capped at one holder, checked before insert.
    if role.is_privileged()
        && state.db.get_account_by_role(&role).await?.is_some()
    {
        return Err(ApiError::Conflict(format!(
            "cannot create another {} account",
            role.as_str()
        )));
    }

    let password_hash = hash_password(&request.password, &state.pepper);
    if password_hash.is_empty() {
        warn!("Storing empty password hash for {}; account cannot log in", request.email);
    }

    let account = state
        .db
        .insert_account(NewAccount {
            email: request.email,
            name: request.name,
            company: request.company,
            password_hash,
            role,
        })
        .await?;

    info!("Registered account {} ({})", account.email, account.role.as_str());
    Ok(account.into())
}

/// POST /api/v1/accounts/register
async fn register(
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    let role = match request.role.as_deref() {
        Some(raw) => AccountRole::from_str(raw)
            .map_err(|_| ApiError::Validation(format!("Invalid role: {}", raw)))?,
        None => AccountRole::default(),
    };

    let account = register_account(&state, request, role).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

/// POST /api/v1/accounts/admin (access-gated)
async fn create_admin(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    Json(request): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountResponse>), ApiError> {
    debug!("Admin creation requested by {}", identity.subject);

    let account = register_account(&state, request, AccountRole::Admin).await?;
    Ok((StatusCode::CREATED, Json(account)))
}

// ==================== Lookup / Deletion / Activation ====================

/// GET /api/v1/accounts
async fn list_accounts(
    State(state): State<AppState>,
) -> Result<Json<Vec<AccountResponse>>, ApiError> {
    let accounts = state.db.list_accounts().await?;
    Ok(Json(accounts.into_iter().map(Into::into).collect()))
}

/// GET /api/v1/accounts/{id}
async fn get_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id = parse_account_id(&id)?;
    let account = state
        .db
        .get_account_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("account {} not found", id)))?;
    Ok(Json(account.into()))
}

/// DELETE /api/v1/accounts/{id} (access-gated)
async fn delete_account(
    RequireAccess(identity): RequireAccess,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    let id = parse_account_id(&id)?;
    debug!("Account {} deletion requested by {}", id, identity.subject);

    if state.db.delete_account(id).await? {
        info!("Account {} deleted by {}", id, identity.subject);
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound(format!("account {} not found", id)))
    }
}

/// POST /api/v1/accounts/{id}/activate
///
/// Sends the confirmation email; only a delivery the provider accepted
/// marks the account active.
async fn activate_account(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<AccountResponse>, ApiError> {
    let id = parse_account_id(&id)?;
    let account = state
        .db
        .get_account_by_id(id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("account {} not found", id)))?;

    let delivered = state
        .notifier
        .send(&account.email, "Confirm your Berth account")
        .await;
    if !delivered {
        return Err(ApiError::Validation(
            "confirmation email could not be delivered".to_string(),
        ));
    }

    state.db.set_account_active(account.id).await?;
    let account = state
        .db
        .get_account_by_id(account.id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("account {} not found", id)))?;

    info!("Account {} activated", account.email);
    Ok(Json(account.into()))
}

/// Create account routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/v1/accounts/register", post(register))
        .route("/api/v1/accounts/admin", post(create_admin))
        .route("/api/v1/accounts", get(list_accounts))
        .route("/api/v1/accounts/{id}", get(get_account))
        .route("/api/v1/accounts/{id}", delete(delete_account))
        .route("/api/v1/accounts/{id}/activate", post(activate_account))
}
