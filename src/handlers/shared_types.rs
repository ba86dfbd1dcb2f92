//! Types shared by every handler: the error taxonomy and the validating
//! JSON extractor.

use axum::{
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::{request::Parts, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{de::DeserializeOwned, Serialize};
use validator::{Validate, ValidationErrors};

use crate::auth::{AuthError, PasswordError, TokenError};
use crate::domain::StoreError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    // ---
    pub error: String,
}

/// Handler-boundary error. Each variant maps to one HTTP status.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    // ---
    /// Malformed or missing request fields (400).
    #[error("{0}")]
    Validation(String),

    /// Unique-constraint violation, reported with a domain message (400).
    #[error("{0}")]
    Conflict(String),

    /// Missing, invalid or expired credentials (401).
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    /// No matching row (404).
    #[error("{0}")]
    NotFound(String),

    /// Store, hashing or signing failure (500). Details are logged, not returned.
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    // ---
    pub fn status(&self) -> StatusCode {
        // ---
        match self {
            ApiError::Validation(_) | ApiError::Conflict(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        // ---
        match err {
            StoreError::Duplicate(constraint) => {
                ApiError::Conflict(format!("record already exists ({constraint})"))
            }
            StoreError::Other(e) => ApiError::Internal(e),
        }
    }
}

impl From<PasswordError> for ApiError {
    fn from(err: PasswordError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl From<TokenError> for ApiError {
    fn from(err: TokenError) -> Self {
        ApiError::Internal(err.into())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        // ---
        if let ApiError::Internal(e) = &self {
            tracing::error!("Request failed: {e:#}");
        }

        let status = self.status();
        (
            status,
            Json(ErrorResponse {
                error: self.to_string(),
            }),
        )
            .into_response()
    }
}

/// JSON body extractor that also runs the payload's `validator` rules.
///
/// Unparsable bodies and rule violations are both rejected as
/// [`ApiError::Validation`] (400).
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        value
            .validate()
            .map_err(|errors| ApiError::Validation(describe(&errors)))?;

        Ok(Self(value))
    }
}

/// Path parameter extractor whose rejection is an [`ApiError::Validation`]
/// (400) with the usual JSON body.
pub struct ApiPath<T>(pub T);

impl<T, S> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // ---
        let Path(value) = Path::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| ApiError::Validation(rejection.body_text()))?;

        Ok(Self(value))
    }
}

/// Flattens validation errors into `field: message` pairs, sorted by field.
fn describe(errors: &ValidationErrors) -> String {
    // ---
    let mut messages: Vec<String> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |e| match &e.message {
                Some(message) => format!("{field}: {message}"),
                None => format!("{field}: {}", e.code),
            })
        })
        .collect();

    messages.sort();
    messages.join("; ")
}
