//! Transfer handlers.
//!
//! A transfer is recorded as a single row. Balances are not checked or moved
//! and the two accounts may hold different currencies.

use axum::{
    extract::State,
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use validator::{Validate, ValidationError};

use super::shared_types::{ApiError, ApiPath, ValidatedJson};
use crate::app_state::AppState;
use crate::auth::AuthUser;
use crate::domain::Transfer;

const ACCOUNT_NOT_FOUND: &str = "Account not found";

#[derive(Debug, Deserialize, Validate)]
pub struct CreateTransferRequest {
    // ---
    #[validate(range(min = 1, message = "must be a positive id"))]
    pub from_account_id: i64,

    #[validate(range(min = 1, message = "must be a positive id"))]
    pub to_account_id: i64,

    #[validate(custom(function = "validate_amount"))]
    pub amount: f64,
}

fn validate_amount(value: f64) -> Result<(), ValidationError> {
    // ---
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ValidationError::new("amount").with_message("must be greater than zero".into()))
    }
}

/// POST /transfer/create
///
/// Records a transfer out of one of the caller's accounts.
///
/// # Errors
/// - `400` for an invalid body or identical source and destination
/// - `404` when the source account is missing or not owned by the caller,
///   or the destination account is missing
#[tracing::instrument(skip(state, req))]
pub async fn create_transfer(
    State(state): State<AppState>,
    caller: AuthUser,
    ValidatedJson(req): ValidatedJson<CreateTransferRequest>,
) -> Result<(StatusCode, Json<Transfer>), ApiError> {
    // ---
    if req.from_account_id == req.to_account_id {
        return Err(ApiError::Validation(
            "to_account_id: must differ from from_account_id".to_string(),
        ));
    }

    let repository = state.repository();

    let from = repository.get_account_by_id(req.from_account_id).await?;
    if !from.is_some_and(|a| a.user_id == caller.user_id) {
        return Err(ApiError::NotFound(ACCOUNT_NOT_FOUND.to_string()));
    }

    if repository.get_account_by_id(req.to_account_id).await?.is_none() {
        return Err(ApiError::NotFound(ACCOUNT_NOT_FOUND.to_string()));
    }

    let transfer = repository
        .create_transfer(req.from_account_id, req.to_account_id, req.amount)
        .await?;

    tracing::info!(transfer_id = transfer.id, "Recorded transfer");

    Ok((StatusCode::CREATED, Json(transfer)))
}

/// GET /transfer/{id}
///
/// A transfer touching one of the caller's accounts. Transfers between other
/// users' accounts are reported as not found.
#[tracing::instrument(skip(state))]
pub async fn get_transfer(
    State(state): State<AppState>,
    caller: AuthUser,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Transfer>, ApiError> {
    // ---
    let not_found = || ApiError::NotFound("Transfer not found".to_string());

    let transfer = state
        .repository()
        .get_transfer_by_id(id)
        .await?
        .ok_or_else(not_found)?;

    let owned = state.repository().get_accounts_by_user(caller.user_id).await?;
    let involved = owned
        .iter()
        .any(|a| a.id == transfer.from_account_id || a.id == transfer.to_account_id);

    if involved {
        Ok(Json(transfer))
    } else {
        Err(not_found())
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;

    fn request(from: i64, to: i64, amount: f64) -> CreateTransferRequest {
        CreateTransferRequest {
            from_account_id: from,
            to_account_id: to,
            amount,
        }
    }

    #[test]
    fn transfer_rules() {
        // ---
        assert!(request(1, 2, 10.0).validate().is_ok());
        assert!(request(1, 2, 0.0).validate().is_err());
        assert!(request(1, 2, -5.0).validate().is_err());
        assert!(request(1, 2, f64::NAN).validate().is_err());
        assert!(request(0, 2, 10.0).validate().is_err());
    }
}
