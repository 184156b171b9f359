//! Encrypted bearer token codec
//!
//! Tokens are PASETO v4.local strings carrying a subject and time
//! bounds. Claims need no confidentiality, but tamper-evidence is
//! mandatory: the subject is trust-bearing, so anything that fails the
//! AEAD integrity check is rejected before the claims are ever read.

use chrono::{DateTime, Duration, Utc};
use rusty_paseto::core::{Key, Local, Paseto, PasetoNonce, PasetoSymmetricKey, Payload, V4};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::AuthError;

/// Token flavor; the two differ only in lifetime.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    Access,
    Refresh,
}

impl TokenKind {
    pub fn ttl(&self) -> Duration {
        match self {
            TokenKind::Access => Duration::hours(2),
            TokenKind::Refresh => Duration::hours(24),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TokenKind::Access => "access",
            TokenKind::Refresh => "refresh",
        }
    }
}

/// Registered PASETO claims plus the token flavor.
#[derive(Debug, Serialize, Deserialize)]
struct Claims {
    sub: String,
    iat: String,
    nbf: String,
    exp: String,
    kind: TokenKind,
}

/// Token codec owning the process-wide symmetric key.
///
/// The key is loaded once at startup and is read-only afterwards, so
/// the codec is safe to share across request tasks behind an `Arc`.
pub struct TokenCodec {
    key: PasetoSymmetricKey<V4, Local>,
}

impl std::fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenCodec").finish_non_exhaustive()
    }
}

impl TokenCodec {
    /// Build a codec from a hex-encoded 32-byte key.
    pub fn from_hex(hex_key: &str) -> Result<Self, AuthError> {
        let bytes = hex::decode(hex_key.trim())
            .map_err(|e| AuthError::KeyUnavailable(format!("token key is not valid hex: {e}")))?;
        let bytes: [u8; 32] = bytes
            .try_into()
            .map_err(|_| AuthError::KeyUnavailable("token key must be exactly 32 bytes".to_string()))?;

        Ok(Self {
            key: PasetoSymmetricKey::from(Key::from(bytes)),
        })
    }

    /// Issue a token for `subject` with the standard lifetime for `kind`.
    pub fn issue(&self, subject: &str, kind: TokenKind) -> Result<String, AuthError> {
        self.issue_with_ttl(subject, kind, kind.ttl())
    }

    /// Issue a token with an explicit lifetime.
    ///
    /// A negative `ttl` produces an already-expired token, which is how
    /// the expiry tests mint their inputs.
    pub fn issue_with_ttl(
        &self,
        subject: &str,
        kind: TokenKind,
        ttl: Duration,
    ) -> Result<String, AuthError> {
        let now = Utc::now();
        let claims = Claims {
            sub: subject.to_string(),
            iat: now.to_rfc3339(),
            nbf: now.to_rfc3339(),
            exp: (now + ttl).to_rfc3339(),
            kind,
        };
        let payload = serde_json::to_string(&claims)
            .map_err(|e| AuthError::KeyUnavailable(format!("claim encoding failed: {e}")))?;

        let nonce = Key::<32>::try_new_random()
            .map_err(|e| AuthError::KeyUnavailable(format!("nonce generation failed: {e}")))?;
        let nonce = PasetoNonce::<V4, Local>::from(&nonce);

        Paseto::<V4, Local>::default()
            .set_payload(Payload::from(payload.as_str()))
            .try_encrypt(&self.key, &nonce)
            .map_err(|e| AuthError::KeyUnavailable(format!("token encryption failed: {e}")))
    }

    /// Decrypt and authenticate a token, returning its subject.
    ///
    /// Anything that fails decryption, parsing, or the kind check is
    /// `Malformed`; a token outside its validity window is `Expired`.
    pub fn validate(&self, token: &str, expected_kind: TokenKind) -> Result<String, AuthError> {
        let payload = Paseto::<V4, Local>::try_decrypt(token, &self.key, None, None)
            .map_err(|e| {
                debug!("Token decryption failed: {}", e);
                AuthError::Malformed
            })?;

        let claims: Claims = serde_json::from_str(&payload).map_err(|_| AuthError::Malformed)?;
        if claims.kind != expected_kind {
            debug!(
                "Token kind mismatch: expected {}, got {}",
                expected_kind.as_str(),
                claims.kind.as_str()
            );
            return Err(AuthError::Malformed);
        }

        let exp = parse_claim_time(&claims.exp)?;
        let nbf = parse_claim_time(&claims.nbf)?;
        let now = Utc::now();
        if now > exp || now < nbf {
            return Err(AuthError::Expired);
        }

        Ok(claims.sub)
    }
}

fn parse_claim_time(value: &str) -> Result<DateTime<Utc>, AuthError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| AuthError::Malformed)
}
