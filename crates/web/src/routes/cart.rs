//! Cart route handlers.
//!
//! All cart routes require authentication; the owner is always the session
//! user, never a field in the request body.

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::instrument;

use sabad_core::CartItemId;

use crate::error::Result;
use crate::middleware::auth::RequireAuth;
use crate::models::CartItem;
use crate::services::CartService;
use crate::state::AppState;

/// Add-to-cart request body. The price arrives as raw form text.
#[derive(Debug, Deserialize)]
pub struct AddItemRequest {
    pub product_name: String,
    pub product_price: String,
}

/// Remove-from-cart request body.
#[derive(Debug, Deserialize)]
pub struct RemoveItemRequest {
    pub item_id: i64,
}

/// Cart item display data.
#[derive(Debug, Serialize)]
pub struct CartItemResponse {
    pub id: i64,
    pub product_name: String,
    #[serde(with = "rust_decimal::serde::str")]
    pub product_price: Decimal,
}

impl From<&CartItem> for CartItemResponse {
    fn from(item: &CartItem) -> Self {
        Self {
            id: item.id.as_i64(),
            product_name: item.product_name.clone(),
            product_price: item.product_price,
        }
    }
}

/// Cart display data.
#[derive(Debug, Serialize)]
pub struct CartResponse {
    pub items: Vec<CartItemResponse>,
    #[serde(with = "rust_decimal::serde::str")]
    pub subtotal: Decimal,
    pub item_count: usize,
}

impl CartResponse {
    fn from_items(items: &[CartItem]) -> Self {
        Self {
            items: items.iter().map(CartItemResponse::from).collect(),
            subtotal: items.iter().map(|item| item.product_price).sum(),
            item_count: items.len(),
        }
    }
}

/// List the current user's cart.
///
/// GET /cart
///
/// Items come back in insertion order with a subtotal.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool());

    let items = cart.list_items(current_user.id).await?;

    Ok(Json(CartResponse::from_items(&items)))
}

/// Add an item to the current user's cart.
///
/// POST /cart/add
///
/// # Errors
///
/// Returns 400 on a blank product name or unparseable/negative price.
#[instrument(skip(state, current_user, req), fields(user_id = %current_user.id))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Json(req): Json<AddItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool());

    let item = cart
        .add_item(current_user.id, &req.product_name, &req.product_price)
        .await?;

    tracing::info!(item_id = %item.id, "item added to cart");

    Ok((StatusCode::CREATED, Json(CartItemResponse::from(&item))))
}

/// Remove an item from the current user's cart.
///
/// POST /cart/remove
///
/// # Errors
///
/// Returns 404 if the item doesn't exist or belongs to another user (the
/// two cases are indistinguishable to the caller).
#[instrument(skip(state, current_user, req), fields(user_id = %current_user.id))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
    Json(req): Json<RemoveItemRequest>,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool());

    cart.remove_item(current_user.id, CartItemId::new(req.item_id))
        .await?;

    tracing::info!(item_id = req.item_id, "item removed from cart");

    Ok(StatusCode::NO_CONTENT)
}

/// Empty the current user's cart.
///
/// POST /cart/clear
///
/// Idempotent; clearing an already-empty cart succeeds.
#[instrument(skip(state, current_user), fields(user_id = %current_user.id))]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(current_user): RequireAuth,
) -> Result<impl IntoResponse> {
    let cart = CartService::new(state.pool());

    let removed = cart.clear(current_user.id).await?;

    tracing::info!(removed, "cart cleared");

    Ok(StatusCode::NO_CONTENT)
}
