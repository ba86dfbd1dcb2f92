//! Registration and login.

use anyhow::Context;
use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use super::shared_types::{ApiError, ValidatedJson};
use crate::app_state::AppState;
use crate::auth::{PasswordHasher, MAX_PASSWORD_BYTES};
use crate::domain::{StoreError, UserResponse};

/// Same message for unknown email and wrong password.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

// ============================================================================
// Request/Response Types
// ============================================================================

/// Body of both `/auth/register` and `/auth/login`.
#[derive(Deserialize, Validate)]
pub struct CredentialsRequest {
    // ---
    #[validate(email(message = "must be a valid email address"))]
    pub email: String,

    #[validate(
        length(min = 6, message = "must be at least 6 characters"),
        custom(function = "validate_password_size")
    )]
    pub password: String,
}

fn validate_password_size(value: &str) -> Result<(), ValidationError> {
    // ---
    if value.len() > MAX_PASSWORD_BYTES {
        return Err(ValidationError::new("password")
            .with_message(format!("must be at most {MAX_PASSWORD_BYTES} bytes").into()));
    }
    Ok(())
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    // ---
    pub token: String,
}

// ============================================================================
// Helpers
// ============================================================================

// bcrypt runs on the blocking pool, not the async workers.
async fn hash_password(hasher: PasswordHasher, password: String) -> Result<String, ApiError> {
    // ---
    let hashed = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .context("password hashing task failed")??;
    Ok(hashed)
}

async fn verify_password(
    hasher: PasswordHasher,
    password: String,
    hash: String,
) -> Result<bool, ApiError> {
    // ---
    let matches = tokio::task::spawn_blocking(move || hasher.verify(&password, &hash))
        .await
        .context("password verification task failed")??;
    Ok(matches)
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/register
///
/// Creates a user from `{email, password}` and responds `201` with the user.
///
/// # Errors
/// - `400` when the body is invalid or the email is already registered
/// - `500` when hashing or the store fails
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<UserResponse>), ApiError> {
    // ---
    let hashed_password = hash_password(state.hasher(), req.password).await?;

    let user = state
        .repository()
        .create_user(&req.email, &hashed_password)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::Conflict("email already exists".to_string()),
            other => other.into(),
        })?;

    state.metrics().record_user_registered();
    tracing::info!(user_id = user.id, "Registered user");

    Ok((StatusCode::CREATED, Json(user.into())))
}

/// POST /auth/login
///
/// Verifies `{email, password}` and responds with a signed token.
///
/// An unknown email is checked against a decoy hash, so it costs the same as
/// a wrong password.
///
/// # Errors
/// - `400` with `Invalid email or password` for an unknown email or a wrong
///   password alike
/// - `500` when the store, hashing or signing fails
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(req): ValidatedJson<CredentialsRequest>,
) -> Result<Json<LoginResponse>, ApiError> {
    // ---
    let invalid = |state: &AppState| {
        state.metrics().record_login(false);
        ApiError::Validation(INVALID_CREDENTIALS.to_string())
    };

    let Some(user) = state.repository().get_user_by_email(&req.email).await? else {
        // Same bcrypt work as a wrong password, so timing does not reveal
        // whether the email is registered.
        let decoy = state.decoy_hash().to_string();
        verify_password(state.hasher(), req.password, decoy).await?;
        tracing::warn!("Login attempt for unknown email");
        return Err(invalid(&state));
    };

    if !verify_password(state.hasher(), req.password, user.hashed_password).await? {
        tracing::warn!(user_id = user.id, "Login attempt with wrong password");
        return Err(invalid(&state));
    }

    let token = state.tokens().issue(user.id)?;

    state.metrics().record_login(true);
    tracing::info!(user_id = user.id, "Issued token");

    Ok(Json(LoginResponse { token }))
}
