//! Password hashing and verification
//!
//! Hashes are scrypt in PHC string format with a fresh random salt per
//! call. A server-wide pepper is mixed into the input before hashing,
//! so a stolen hash database alone is not enough to mount verification.

use scrypt::password_hash::rand_core::OsRng;
use scrypt::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use scrypt::{Params, Scrypt};
use tracing::warn;

use crate::error::AuthError;

/// log2(N) = 15, i.e. N = 32768
const SCRYPT_LOG_N: u8 = 15;
const SCRYPT_R: u32 = 16;
const SCRYPT_P: u32 = 1;

fn peppered(password: &str, pepper: &str) -> String {
    format!("{password}{pepper}")
}

fn try_hash(password: &str, pepper: &str) -> Result<String, AuthError> {
    let params = Params::new(SCRYPT_LOG_N, SCRYPT_R, SCRYPT_P, Params::RECOMMENDED_LEN)
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;
    let salt = SaltString::generate(&mut OsRng);

    let hash = Scrypt
        .hash_password_customized(
            peppered(password, pepper).as_bytes(),
            None,
            None,
            params,
            &salt,
        )
        .map_err(|e| AuthError::PasswordHash(e.to_string()))?;

    Ok(hash.to_string())
}

/// Hash a password for storage.
///
/// On hashing failure the error is logged and an empty string is
/// returned; an empty hash can never verify, so the account is left
/// un-loginable rather than the request crashing.
pub fn hash_password(password: &str, pepper: &str) -> String {
    match try_hash(password, pepper) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Password hashing failed: {}", e);
            String::new()
        }
    }
}

/// Verify a password against a stored hash.
///
/// Recomputes with the parameters embedded in `stored`. Malformed input
/// never panics or errors; it verifies as false.
pub fn verify_password(password: &str, pepper: &str, stored: &str) -> bool {
    let Ok(parsed) = PasswordHash::new(stored) else {
        return false;
    };
    Scrypt
        .verify_password(peppered(password, pepper).as_bytes(), &parsed)
        .is_ok()
}
