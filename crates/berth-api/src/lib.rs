//! Berth REST API
//!
//! This crate provides the Axum-based HTTP API for Berth: account
//! registration, lookup, deletion, activation, and the login/refresh
//! flow guarded by the bearer gates.

pub mod error;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use routes::create_router;
pub use state::AppState;
