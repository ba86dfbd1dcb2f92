//! Account handlers.
//!
//! Every route here sits behind the access gate; the caller only ever sees
//! and creates their own accounts.

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::shared_types::{ApiError, ValidatedJson};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::{Account, Currency, StoreError};

#[derive(Debug, Deserialize, Validate)]
pub struct CreateAccountRequest {
    // ---
    #[validate(custom(function = "validate_currency"))]
    pub currency: String,
}

fn validate_currency(value: &str) -> Result<(), ValidationError> {
    // ---
    value.parse::<Currency>().map(|_| ()).map_err(|_| {
        ValidationError::new("currency").with_message("unsupported currency".into())
    })
}

/// POST /account/create
///
/// Opens an account for the caller in the requested currency.
///
/// # Errors
/// - `400` for an unsupported currency or when the caller already holds an
///   account in that currency (`Account already exists`)
#[tracing::instrument(skip(state, req))]
pub async fn create_account(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateAccountRequest>,
) -> Result<(StatusCode, Json<Account>), ApiError> {
    // ---
    let currency = req
        .currency
        .parse::<Currency>()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let account = state
        .repository()
        .create_account(caller.user_id, currency)
        .await
        .map_err(|e| match e {
            StoreError::Duplicate(_) => ApiError::Conflict("Account already exists".to_string()),
            other => other.into(),
        })?;

    state.metrics().record_account_created();
    tracing::info!(account_id = account.id, %currency, "Opened account");

    Ok((StatusCode::CREATED, Json(account)))
}

/// GET /account
///
/// All of the caller's accounts.
#[tracing::instrument(skip(state))]
pub async fn list_accounts(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<Account>>, ApiError> {
    // ---
    let accounts = state.repository().get_accounts_by_user(caller.user_id).await?;
    Ok(Json(accounts))
}
