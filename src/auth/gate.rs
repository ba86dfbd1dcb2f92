//! Access gate for protected routes.
//!
//! `require_auth` runs before every protected handler. It reads the bearer
//! token, verifies it, and attaches the caller's identity to the request.
//! Handlers pick the identity up with the [`AuthUser`] extractor.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::AuthError;
use crate::app_state::AppState;

/// Identity of the caller, valid for the current request only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser {
    pub user_id: i64,
}

/// Extracts the token from `Authorization: Bearer <token>`.
///
/// The scheme keyword is case-insensitive and the value must split into
/// exactly two whitespace-separated parts.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    // ---
    let value = headers
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingCredentials)?
        .to_str()
        .map_err(|_| AuthError::InvalidHeader)?;

    if value.trim().is_empty() {
        return Err(AuthError::MissingCredentials);
    }

    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::InvalidHeader),
    }
}

/// Middleware guarding protected routes.
///
/// Rejects with 401 before the handler runs when the header is missing,
/// malformed, or carries a token that does not verify.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AuthError> {
    // ---
    let verified = bearer_token(request.headers())
        .and_then(|token| state.tokens().verify(token));

    let user_id = verified.map_err(|e| {
        tracing::debug!(
            kind = e.kind(),
            path = %request.uri().path(),
            "Rejected unauthenticated request"
        );
        e
    })?;

    request.extensions_mut().insert(AuthUser { user_id });
    Ok(next.run(request).await)
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        // ---
        parts
            .extensions
            .get::<AuthUser>()
            .copied()
            .ok_or(AuthError::MissingCredentials)
    }
}
