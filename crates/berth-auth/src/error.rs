//! Authentication error types

use thiserror::Error;

/// Failures inside the auth subsystem.
///
/// The distinction between variants is for logging only; remote callers
/// see a uniform 401 so token validity cannot be probed.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Token is malformed or could not be authenticated")]
    Malformed,

    #[error("Token is outside its validity window")]
    Expired,

    #[error("Token key unavailable: {0}")]
    KeyUnavailable(String),

    #[error("Password hashing error: {0}")]
    PasswordHash(String),
}
