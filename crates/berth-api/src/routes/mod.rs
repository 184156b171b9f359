//! API routes

mod accounts;
mod auth;
mod health;
pub mod types;

use axum::Router;

use crate::state::AppState;

pub use auth::{RequireAccess, RequireRefresh};
pub use types::{AccountResponse, LoginRequest, RegisterRequest, TokenPairResponse};

/// Create the main router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(health::routes())
        .merge(accounts::routes())
        .merge(auth::routes())
        .with_state(state)
}
