//! Integration tests for cart operations.
//!
//! Runs against an in-memory `SQLite` database; the single-connection pool
//! keeps every query on the same in-memory instance.

#![allow(clippy::unwrap_used)]

use std::str::FromStr;

use rust_decimal::Decimal;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use sabad_core::{CartItemId, UserId};
use sabad_web::db;
use sabad_web::services::{AuthService, CartError, CartService};

async fn test_pool() -> SqlitePool {
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
    pool
}

async fn register(pool: &SqlitePool, username: &str) -> UserId {
    AuthService::new(pool)
        .register(username, "password1")
        .await
        .unwrap()
        .id
}

#[tokio::test]
async fn add_list_remove_roundtrip() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    let item = cart.add_item(user, "Widget", "1200").await.unwrap();
    assert_eq!(item.product_name, "Widget");
    assert_eq!(item.product_price, Decimal::from(1200));

    let items = cart.list_items(user).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().id, item.id);

    cart.remove_item(user, item.id).await.unwrap();

    let items = cart.list_items(user).await.unwrap();
    assert!(items.is_empty());
}

#[tokio::test]
async fn list_preserves_insertion_order() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    cart.add_item(user, "First", "1").await.unwrap();
    cart.add_item(user, "Second", "2").await.unwrap();
    cart.add_item(user, "Third", "3").await.unwrap();

    let items = cart.list_items(user).await.unwrap();
    let names: Vec<&str> = items.iter().map(|i| i.product_name.as_str()).collect();
    assert_eq!(names, ["First", "Second", "Third"]);
}

#[tokio::test]
async fn add_parses_localized_price_text() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    let item = cart.add_item(user, "Widget", "1,200 تومان").await.unwrap();
    assert_eq!(item.product_price, Decimal::from(1200));

    // The parsed value survives the storage round trip
    let items = cart.list_items(user).await.unwrap();
    assert_eq!(items.first().unwrap().product_price, Decimal::from(1200));
}

#[tokio::test]
async fn add_rejects_negative_price() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    let result = cart.add_item(user, "Widget", "-5").await;
    assert!(matches!(result, Err(CartError::InvalidPrice(_))));

    // Nothing was stored
    assert!(cart.list_items(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn add_rejects_unparseable_price() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    let result = cart.add_item(user, "Widget", "free").await;
    assert!(matches!(result, Err(CartError::InvalidPrice(_))));
}

#[tokio::test]
async fn add_rejects_blank_product_name() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    let result = cart.add_item(user, "   ", "100").await;
    assert!(matches!(result, Err(CartError::EmptyProductName)));
}

#[tokio::test]
async fn remove_rejects_other_users_item() {
    let pool = test_pool().await;
    let alice = register(&pool, "alice").await;
    let bob = register(&pool, "bob").await;
    let cart = CartService::new(&pool);

    let item = cart.add_item(alice, "Widget", "100").await.unwrap();

    let result = cart.remove_item(bob, item.id).await;
    assert!(matches!(result, Err(CartError::NotOwner)));

    // The item is untouched
    let items = cart.list_items(alice).await.unwrap();
    assert_eq!(items.len(), 1);
    assert_eq!(items.first().unwrap().id, item.id);
}

#[tokio::test]
async fn remove_unknown_item_fails() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    let result = cart.remove_item(user, CartItemId::new(999)).await;
    assert!(matches!(result, Err(CartError::NotFound)));
}

#[tokio::test]
async fn clear_is_idempotent() {
    let pool = test_pool().await;
    let user = register(&pool, "alice").await;
    let cart = CartService::new(&pool);

    cart.add_item(user, "Widget", "100").await.unwrap();
    cart.add_item(user, "Gadget", "200").await.unwrap();

    let removed = cart.clear(user).await.unwrap();
    assert_eq!(removed, 2);

    // Second clear finds nothing and still succeeds
    let removed = cart.clear(user).await.unwrap();
    assert_eq!(removed, 0);

    assert!(cart.list_items(user).await.unwrap().is_empty());
}

#[tokio::test]
async fn carts_are_isolated_per_user() {
    let pool = test_pool().await;
    let alice = register(&pool, "alice").await;
    let bob = register(&pool, "bob").await;
    let cart = CartService::new(&pool);

    cart.add_item(alice, "Widget", "100").await.unwrap();
    cart.add_item(bob, "Gadget", "200").await.unwrap();
    cart.add_item(bob, "Gizmo", "300").await.unwrap();

    assert_eq!(cart.list_items(alice).await.unwrap().len(), 1);
    assert_eq!(cart.list_items(bob).await.unwrap().len(), 2);

    cart.clear(bob).await.unwrap();

    // Alice's cart is unaffected by Bob's clear
    assert_eq!(cart.list_items(alice).await.unwrap().len(), 1);
}
