//! User and cart domain types.
//!
//! These types represent validated domain objects separate from database row types.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use sabad_core::{CartItemId, UserId, Username};

/// An account holder (domain type).
///
/// The password hash is deliberately not part of this type; it stays inside
/// the repository layer and never crosses into handlers or responses.
#[derive(Debug, Clone)]
pub struct User {
    /// Unique user ID.
    pub id: UserId,
    /// Unique username.
    pub username: Username,
    /// When the user was created.
    pub created_at: DateTime<Utc>,
    /// When the user was last updated.
    pub updated_at: DateTime<Utc>,
}

/// A cart line item (domain type).
///
/// Owned by exactly one user; visibility and mutation are restricted to the
/// owner.
#[derive(Debug, Clone)]
pub struct CartItem {
    /// Unique item ID.
    pub id: CartItemId,
    /// User who owns this item.
    pub owner_user_id: UserId,
    /// Product name as entered.
    pub product_name: String,
    /// Non-negative price.
    pub product_price: Decimal,
    /// When this item was added.
    pub created_at: DateTime<Utc>,
}
