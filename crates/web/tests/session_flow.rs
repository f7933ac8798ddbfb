//! Integration tests for the session authority.
//!
//! Drives the full router over `tower::ServiceExt::oneshot` with an
//! in-memory `SQLite` database, exercising the session cookie lifecycle:
//! issue on login, rotation, revocation on logout, and revalidation against
//! the user store on every authenticated request.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, Response, StatusCode, header};
use secrecy::SecretString;
use serde_json::{Value, json};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tower::ServiceExt;

use sabad_web::config::AppConfig;
use sabad_web::state::AppState;
use sabad_web::{db, middleware, routes};

async fn test_app() -> Router {
    let options = SqliteConnectOptions::from_str("sqlite::memory:")
        .unwrap()
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect_with(options)
        .await
        .unwrap();

    db::init_schema(&pool).await.unwrap();

    let config = AppConfig {
        database_url: SecretString::from("sqlite::memory:"),
        host: "127.0.0.1".parse().unwrap(),
        port: 3000,
        base_url: "http://localhost:3000".to_string(),
        sentry_dsn: None,
        sentry_environment: None,
        sentry_sample_rate: 1.0,
        sentry_traces_sample_rate: 0.0,
    };

    let session_store = middleware::create_session_store(&pool);
    session_store.migrate().await.unwrap();
    let session_layer = middleware::create_session_layer(session_store, &config);

    let state = AppState::new(config, pool);

    routes::routes().layer(session_layer).with_state(state)
}

async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    cookie: Option<&str>,
    body: Option<Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .unwrap();

    app.clone().oneshot(request).await.unwrap()
}

/// The session cookie from a response's Set-Cookie header (name=value only).
fn session_cookie(response: &Response<Body>) -> String {
    let raw = response
        .headers()
        .get(header::SET_COOKIE)
        .expect("Set-Cookie header")
        .to_str()
        .unwrap();
    raw.split(';').next().unwrap().to_string()
}

async fn register_and_login(app: &Router, username: &str) -> String {
    let response = send(
        app,
        "POST",
        "/auth/register",
        None,
        Some(json!({ "username": username, "password": "password1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = send(
        app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": username, "password": "password1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    session_cookie(&response)
}

#[tokio::test]
async fn cart_requires_authentication() {
    let app = test_app().await;

    let response = send(&app, "GET", "/cart", None, None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_issues_a_working_session() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "alice").await;

    let response = send(&app, "GET", "/cart", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn login_rotates_the_session_id() {
    let app = test_app().await;
    let first = register_and_login(&app, "alice").await;

    // Logging in again on an existing session hands out a fresh cookie
    let response = send(
        &app,
        "POST",
        "/auth/login",
        Some(&first),
        Some(json!({ "username": "alice", "password": "password1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = session_cookie(&response);
    assert_ne!(first, second);
}

#[tokio::test]
async fn logout_revokes_the_session() {
    let app = test_app().await;
    let cookie = register_and_login(&app, "alice").await;

    let response = send(&app, "POST", "/auth/logout", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // The old cookie no longer authenticates
    let response = send(&app, "GET", "/cart", Some(&cookie), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn account_deletion_invalidates_every_session() {
    let app = test_app().await;
    let first = register_and_login(&app, "alice").await;

    // Second login from another client, same account
    let response = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "password1" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let second = session_cookie(&response);

    // Delete the account from the first client
    let response = send(&app, "POST", "/account/delete", Some(&first), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // Both sessions are dead, not just the deleting one
    let response = send(&app, "GET", "/cart", Some(&first), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let response = send(&app, "GET", "/cart", Some(&second), None).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn deleted_account_cannot_write_to_the_cart() {
    let app = test_app().await;
    let first = register_and_login(&app, "alice").await;
    let response = send(
        &app,
        "POST",
        "/auth/login",
        None,
        Some(json!({ "username": "alice", "password": "password1" })),
    )
    .await;
    let second = session_cookie(&response);

    let response = send(&app, "POST", "/account/delete", Some(&first), None).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    // A write with the surviving cookie is rejected as unauthenticated,
    // never a constraint failure from inserting under a missing owner
    let response = send(
        &app,
        "POST",
        "/cart/add",
        Some(&second),
        Some(json!({ "product_name": "Widget", "product_price": "100" })),
    )
    .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
