//! Identity token issuance and verification.
//!
//! Tokens are HMAC-signed JWTs carrying the user id and an absolute expiry.
//! Nothing is stored server-side: a token is valid until `exp` and cannot be
//! revoked earlier.

use chrono::Utc;
use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::AuthError;

/// Algorithm used for newly issued tokens.
const SIGNING_ALGORITHM: Algorithm = Algorithm::HS256;

/// Token claims.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the authenticated user.
    pub user_id: i64,
    /// Issued at (Unix seconds).
    pub iat: i64,
    /// Expiry (Unix seconds).
    pub exp: i64,
}

/// Token issuance failures.
#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    // ---
    #[error("token signing secret is unavailable")]
    MissingSecret,

    #[error("token signing failed: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies tokens with one shared secret.
///
/// Built once at startup and shared read-only by every request.
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenService")
            .field("ttl", &self.ttl)
            .finish_non_exhaustive()
    }
}

impl TokenService {
    // ---
    /// # Errors
    /// Fails with [`TokenError::MissingSecret`] when `secret` is empty.
    pub fn new(secret: &str, ttl: Duration) -> Result<Self, TokenError> {
        // ---
        if secret.is_empty() {
            return Err(TokenError::MissingSecret);
        }

        // Any HMAC variant verifies against the shared secret; every other
        // family is refused before the signature is looked at.
        let mut validation = Validation::new(SIGNING_ALGORITHM);
        validation.algorithms = vec![Algorithm::HS256, Algorithm::HS384, Algorithm::HS512];
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp"]);

        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl,
        })
    }

    pub fn ttl(&self) -> Duration {
        // ---
        self.ttl
    }

    /// Signs a token for `user_id` that expires `ttl` from now.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        // ---
        let now = Utc::now().timestamp();
        let ttl = i64::try_from(self.ttl.as_secs()).unwrap_or(i64::MAX);

        self.sign(&Claims {
            user_id,
            iat: now,
            exp: now.saturating_add(ttl),
        })
    }

    fn sign(&self, claims: &Claims) -> Result<String, TokenError> {
        // ---
        Ok(encode(
            &Header::new(SIGNING_ALGORITHM),
            claims,
            &self.encoding,
        )?)
    }

    /// Returns the user id carried by a valid token.
    ///
    /// A token past `exp` is [`AuthError::Expired`]; a foreign algorithm is
    /// [`AuthError::InvalidAlgorithm`]; a bad signature is
    /// [`AuthError::InvalidSignature`]; anything unparsable is
    /// [`AuthError::Malformed`].
    pub fn verify(&self, token: &str) -> Result<i64, AuthError> {
        // ---
        let data = decode::<Claims>(token, &self.decoding, &self.validation).map_err(|e| {
            match e.kind() {
                ErrorKind::InvalidSignature => AuthError::InvalidSignature,
                ErrorKind::InvalidAlgorithm => AuthError::InvalidAlgorithm,
                ErrorKind::ExpiredSignature => AuthError::Expired,
                _ => AuthError::Malformed,
            }
        })?;

        Ok(data.claims.user_id)
    }
}
