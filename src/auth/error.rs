use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

/// Why a request could not be authenticated.
///
/// The variants stay distinct for logging. Clients only ever see a 401 whose
/// message is `Unauthorized` or `Invalid token`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    // ---
    /// No `Authorization` header, or no identity attached to the request.
    #[error("Unauthorized")]
    MissingCredentials,

    /// The header is not `Bearer <token>`.
    #[error("Invalid token")]
    InvalidHeader,

    /// The token could not be decoded.
    #[error("Invalid token")]
    Malformed,

    /// The signature does not match the shared secret.
    #[error("Invalid token")]
    InvalidSignature,

    /// The token was signed with something other than HMAC.
    #[error("Invalid token")]
    InvalidAlgorithm,

    /// The token is past its expiry.
    #[error("Invalid token")]
    Expired,
}

impl AuthError {
    // ---
    /// Stable name for log lines.
    pub fn kind(&self) -> &'static str {
        // ---
        match self {
            AuthError::MissingCredentials => "missing_credentials",
            AuthError::InvalidHeader => "invalid_header",
            AuthError::Malformed => "malformed",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::InvalidAlgorithm => "invalid_algorithm",
            AuthError::Expired => "expired",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        // ---
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "error": self.to_string() })),
        )
            .into_response()
    }
}
