use axum::{extract::State, Json};

use super::shared_types::ApiError;
use crate::app_state::AppState;
use crate::auth::{AuthError, AuthUser};
use crate::domain::UserResponse;

/// Page size of `GET /users`.
pub const USERS_PAGE_SIZE: i64 = 10;

/// GET /users
///
/// First page of users, ordered by id.
#[tracing::instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    // ---
    let users = state.repository().list_users(USERS_PAGE_SIZE, 0).await?;

    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/me
///
/// The authenticated caller. A valid token for a user that no longer exists
/// is `401 Unauthorized`.
#[tracing::instrument(skip(state))]
pub async fn get_logged_in_user(
    State(state): State<AppState>,
    caller: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    // ---
    let user = state
        .repository()
        .get_user_by_id(caller.user_id)
        .await?
        .ok_or(AuthError::MissingCredentials)?;

    Ok(Json(user.into()))
}
