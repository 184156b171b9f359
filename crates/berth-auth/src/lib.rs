//! Berth Authentication
//!
//! This crate provides password hashing, encrypted bearer tokens, and
//! the request gate for Berth. Tokens are PASETO v4.local: symmetric
//! authenticated encryption, so a subject claim cannot be forged or
//! altered without the process-wide key.

pub mod error;
pub mod gate;
pub mod password;
pub mod token;

pub use error::AuthError;
pub use gate::{GateRejection, Identity, check_bearer};
pub use password::{hash_password, verify_password};
pub use token::{TokenCodec, TokenKind};
