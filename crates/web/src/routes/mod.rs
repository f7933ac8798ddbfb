//! HTTP route handlers.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                 - Liveness check
//! GET  /health/ready           - Readiness check (DB ping)
//!
//! # Auth
//! POST /auth/register          - Create an account
//! POST /auth/login             - Login action (sets session cookie)
//! POST /auth/logout            - Logout action (destroys session)
//!
//! # Account (requires auth)
//! GET  /account                - Profile summary
//! POST /account/profile        - Update username and/or password
//! POST /account/delete         - Delete account + cart (cascade)
//!
//! # Cart (requires auth)
//! GET  /cart                   - List cart items with subtotal
//! POST /cart/add               - Add an item
//! POST /cart/remove            - Remove an owned item
//! POST /cart/clear             - Empty the cart (idempotent)
//! ```

pub mod account;
pub mod auth;
pub mod cart;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show))
        .route("/profile", post(account::update_profile))
        .route("/delete", post(account::delete))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create all routes for the service.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/account", account_routes())
        .nest("/cart", cart_routes())
}
