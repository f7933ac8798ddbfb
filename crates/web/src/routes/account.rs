//! Account route handlers.
//!
//! These routes require authentication via the [`RequireAuth`] extractor.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::auth::RequireAuth;
use crate::routes::auth::UserResponse;
use crate::services::AuthService;
use crate::state::AppState;

/// Profile update request body. Both fields are optional.
#[derive(Debug, Deserialize)]
pub struct UpdateProfileRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Display the current user's profile.
///
/// GET /account
///
/// # Errors
///
/// Returns 404 if the account is deleted between the auth check and the
/// lookup.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    let user = auth.get_user(current_user.id).await?;

    Ok(Json(UserResponse::from(&user)))
}

/// Update the current user's username and/or password.
///
/// POST /account/profile
///
/// Omitted fields are untouched; a body with neither field is a no-op that
/// returns the current profile.
///
/// # Errors
///
/// Returns 409 if the new username is taken, 400 on validation failure.
#[instrument(skip(state, session, current_user, req), fields(user_id = %current_user.id))]
pub async fn update_profile(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
    Json(req): Json<UpdateProfileRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    let user = auth
        .update_profile(
            current_user.id,
            req.username.as_deref(),
            req.password.as_deref(),
        )
        .await?;

    // Keep the session's display identity in sync with the new username
    let refreshed = crate::models::CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };
    crate::middleware::set_current_user(&session, &refreshed)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, "profile updated");

    Ok(Json(UserResponse::from(&user)))
}

/// Delete the current user's account.
///
/// POST /account/delete
///
/// Removes the user and every cart item they own in one transaction, then
/// destroys the session so the old token fails authentication.
///
/// # Errors
///
/// Returns 404 if the account no longer exists.
#[instrument(skip(state, session, current_user), fields(user_id = %current_user.id))]
pub async fn delete(
    State(state): State<AppState>,
    session: Session,
    RequireAuth(current_user): RequireAuth,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    auth.delete_account(current_user.id).await?;

    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %current_user.id, "account deleted");

    Ok(StatusCode::NO_CONTENT)
}
