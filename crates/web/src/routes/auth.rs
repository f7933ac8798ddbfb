//! Authentication route handlers.
//!
//! JSON endpoints for registration, login, and logout. Login stores the
//! authenticated identity in the session and cycles the session id; logout
//! destroys the session entirely so the old cookie stops working.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, User};
use crate::services::AuthService;
use crate::state::AppState;

/// Registration request body.
#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// User summary returned by auth and account endpoints.
#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.as_i64(),
            username: user.username.to_string(),
        }
    }
}

/// Create a new account.
///
/// POST /auth/register
///
/// Registration does not log the user in; clients call `/auth/login` next.
///
/// # Errors
///
/// Returns 409 if the username is taken, 400 on validation failure.
#[instrument(skip(state, req), fields(username = %req.username))]
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    let user = auth.register(&req.username, &req.password).await?;

    tracing::info!(user_id = %user.id, "account registered");

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}

/// Login with username and password.
///
/// POST /auth/login
///
/// On success the session holds the user identity and gets a fresh id.
///
/// # Errors
///
/// Returns 401 on bad credentials, without revealing whether the username or
/// the password was wrong.
#[instrument(skip(state, session, req), fields(username = %req.username))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse> {
    let auth = AuthService::new(state.pool());

    let user = auth.login(&req.username, &req.password).await?;

    let current_user = CurrentUser {
        id: user.id,
        username: user.username.clone(),
    };

    set_current_user(&session, &current_user)
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    // Fresh session id on every login so a pre-login token is never reused
    session
        .cycle_id()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    tracing::info!(user_id = %user.id, "login");

    Ok(Json(UserResponse::from(&user)))
}

/// Logout the current session.
///
/// POST /auth/logout
///
/// Always succeeds; logging out an anonymous session is a no-op.
#[instrument(skip(session))]
pub async fn logout(session: Session) -> Result<impl IntoResponse> {
    if let Err(e) = clear_current_user(&session).await {
        tracing::error!("Failed to clear session: {e}");
    }

    // Destroy the entire session; the old token is invalid afterward
    session
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("session error: {e}")))?;

    Ok(StatusCode::NO_CONTENT)
}
