//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring authentication in route handlers.
//! [`RequireAuth`] is the single authorization choke-point: every cart,
//! profile, and account-deletion handler goes through it.

use axum::{
    Json,
    extract::FromRequestParts,
    http::{StatusCode, request::Parts},
    response::{IntoResponse, Response},
};
use serde_json::json;
use tower_sessions::Session;

use crate::db::UserRepository;
use crate::models::{CurrentUser, session_keys};
use crate::state::AppState;

/// Extractor that requires an authenticated user.
///
/// The session only proves possession of a cookie; the extractor confirms the
/// account still exists on every request, so all sessions of a deleted user
/// go anonymous immediately. If the caller is not logged in (or the account is
/// gone), the request is rejected with 401.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Rejection for [`RequireAuth`].
pub enum AuthRejection {
    /// No session, no stored identity, or the account no longer exists.
    Unauthenticated,
    /// The revalidation lookup itself failed.
    Internal,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "error": "Authentication required" })),
            )
                .into_response(),
            Self::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "error": "Internal server error" })),
            )
                .into_response(),
        }
    }
}

impl FromRequestParts<AppState> for RequireAuth {
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Get the session from extensions (set by SessionManagerLayer)
        let session = parts
            .extensions
            .get::<Session>()
            .cloned()
            .ok_or(AuthRejection::Unauthenticated)?;

        // Get the claimed identity from the session
        let claimed: CurrentUser = session
            .get(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten()
            .ok_or(AuthRejection::Unauthenticated)?;

        // Revalidate against the store; the session may outlive the account
        let user = UserRepository::new(state.pool())
            .get_by_id(claimed.id)
            .await
            .map_err(|e| {
                tracing::error!("user revalidation failed: {e}");
                AuthRejection::Internal
            })?;

        let Some(user) = user else {
            // Stale session for a deleted account; destroy it
            if let Err(e) = session.flush().await {
                tracing::error!("failed to flush stale session: {e}");
            }
            return Err(AuthRejection::Unauthenticated);
        };

        Ok(Self(CurrentUser {
            id: user.id,
            username: user.username,
        }))
    }
}

/// Helper to set the current user in the session (login).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Helper to clear the current user from the session (logout).
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    Ok(())
}
