//! Cart service.
//!
//! Owns cart validation and the ownership rules: an item is visible and
//! mutable only by its owner, and the ownership check always reads the stored
//! owner, never a caller-supplied claim.

use sqlx::SqlitePool;
use thiserror::Error;

use sabad_core::{CartItemId, Price, PriceError, UserId};

use crate::db::RepositoryError;
use crate::db::cart::CartItemRepository;
use crate::models::CartItem;

/// Errors that can occur during cart operations.
#[derive(Debug, Error)]
pub enum CartError {
    /// Product name is empty or whitespace only.
    #[error("product name cannot be empty")]
    EmptyProductName,

    /// Price text could not be parsed as a non-negative amount.
    #[error("invalid price: {0}")]
    InvalidPrice(#[from] PriceError),

    /// Item does not exist.
    #[error("item not found")]
    NotFound,

    /// Item exists but belongs to another user.
    ///
    /// Distinct from [`CartError::NotFound`] internally; the HTTP layer
    /// collapses both into the same response so callers can't probe other
    /// users' carts.
    #[error("item belongs to another user")]
    NotOwner,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Cart service.
///
/// Handles adding, listing, and removing items for a single owner.
pub struct CartService<'a> {
    items: CartItemRepository<'a>,
}

impl<'a> CartService<'a> {
    /// Create a new cart service.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self {
            items: CartItemRepository::new(pool),
        }
    }

    /// Add an item to `owner`'s cart.
    ///
    /// The price arrives as raw form text and is parsed per [`Price::parse`]
    /// (thousands separators and currency-unit suffixes stripped, negative
    /// amounts rejected).
    ///
    /// # Errors
    ///
    /// Returns `CartError::EmptyProductName` if the name is blank.
    /// Returns `CartError::InvalidPrice` if the price text doesn't parse.
    pub async fn add_item(
        &self,
        owner: UserId,
        product_name: &str,
        raw_price: &str,
    ) -> Result<CartItem, CartError> {
        let product_name = product_name.trim();
        if product_name.is_empty() {
            return Err(CartError::EmptyProductName);
        }

        let price = Price::parse(raw_price)?;

        let item = self.items.insert(owner, product_name, price).await?;

        Ok(item)
    }

    /// List all items in `owner`'s cart, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn list_items(&self, owner: UserId) -> Result<Vec<CartItem>, CartError> {
        let items = self.items.list_for_user(owner).await?;
        Ok(items)
    }

    /// Remove an item from `owner`'s cart.
    ///
    /// The ownership check runs before deletion against the stored owner.
    ///
    /// # Errors
    ///
    /// Returns `CartError::NotFound` if the item doesn't exist.
    /// Returns `CartError::NotOwner` if the item belongs to another user.
    pub async fn remove_item(&self, owner: UserId, item_id: CartItemId) -> Result<(), CartError> {
        let item = self.items.get(item_id).await?.ok_or(CartError::NotFound)?;

        if item.owner_user_id != owner {
            return Err(CartError::NotOwner);
        }

        self.items.delete(item_id).await.map_err(|e| match e {
            // Lost a race with another removal; the item is gone either way
            RepositoryError::NotFound => CartError::NotFound,
            other => CartError::Repository(other),
        })
    }

    /// Remove everything in `owner`'s cart.
    ///
    /// Idempotent: clearing an empty cart is a no-op.
    ///
    /// # Returns
    ///
    /// The number of items removed.
    ///
    /// # Errors
    ///
    /// Returns `CartError::Repository` if the database operation fails.
    pub async fn clear(&self, owner: UserId) -> Result<u64, CartError> {
        let removed = self.items.delete_all_for_user(owner).await?;
        Ok(removed)
    }
}
