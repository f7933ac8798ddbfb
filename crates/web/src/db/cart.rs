//! Cart item repository for database operations.
//!
//! Prices are stored as decimal text (`rust_decimal` rendering) because
//! sqlx's decimal integration does not cover `SQLite`; the repository parses
//! them back on read and treats malformed values as data corruption.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::SqlitePool;

use sabad_core::{CartItemId, Price, UserId};

use super::RepositoryError;
use crate::models::CartItem;

/// Database row for a cart item.
#[derive(sqlx::FromRow)]
struct CartItemRow {
    id: i64,
    owner_user_id: i64,
    product_name: String,
    product_price: String,
    created_at: DateTime<Utc>,
}

impl CartItemRow {
    /// Convert a row to the domain type, validating stored data.
    fn into_item(self) -> Result<CartItem, RepositoryError> {
        let product_price = Decimal::from_str(&self.product_price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price in database: {e}"))
        })?;

        Ok(CartItem {
            id: CartItemId::new(self.id),
            owner_user_id: UserId::new(self.owner_user_id),
            product_name: self.product_name,
            product_price,
            created_at: self.created_at,
        })
    }
}

/// Repository for cart item database operations.
pub struct CartItemRepository<'a> {
    pool: &'a SqlitePool,
}

impl<'a> CartItemRepository<'a> {
    /// Create a new cart item repository.
    #[must_use]
    pub const fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a new cart item owned by `owner`.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails (including
    /// foreign-key failure when the owner no longer exists).
    pub async fn insert(
        &self,
        owner: UserId,
        product_name: &str,
        product_price: Price,
    ) -> Result<CartItem, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            "INSERT INTO cart_items (owner_user_id, product_name, product_price, created_at)
             VALUES (?, ?, ?, ?)
             RETURNING id, owner_user_id, product_name, product_price, created_at",
        )
        .bind(owner.as_i64())
        .bind(product_name)
        .bind(product_price.amount().to_string())
        .bind(Utc::now())
        .fetch_one(self.pool)
        .await?;

        row.into_item()
    }

    /// List all items owned by `owner`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored price is invalid.
    pub async fn list_for_user(&self, owner: UserId) -> Result<Vec<CartItem>, RepositoryError> {
        let rows = sqlx::query_as::<_, CartItemRow>(
            "SELECT id, owner_user_id, product_name, product_price, created_at
             FROM cart_items
             WHERE owner_user_id = ?
             ORDER BY id ASC",
        )
        .bind(owner.as_i64())
        .fetch_all(self.pool)
        .await?;

        rows.into_iter().map(CartItemRow::into_item).collect()
    }

    /// Get an item by its ID, regardless of owner.
    ///
    /// The caller is responsible for the ownership check; the stored
    /// `owner_user_id` is the only source of truth for it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn get(&self, id: CartItemId) -> Result<Option<CartItem>, RepositoryError> {
        let row = sqlx::query_as::<_, CartItemRow>(
            "SELECT id, owner_user_id, product_name, product_price, created_at
             FROM cart_items WHERE id = ?",
        )
        .bind(id.as_i64())
        .fetch_optional(self.pool)
        .await?;

        row.map(CartItemRow::into_item).transpose()
    }

    /// Delete an item by its ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::NotFound` if the item doesn't exist.
    /// Returns `RepositoryError::Database` for other database errors.
    pub async fn delete(&self, id: CartItemId) -> Result<(), RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE id = ?")
            .bind(id.as_i64())
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    /// Delete all items owned by `owner`.
    ///
    /// Idempotent: an empty cart is a no-op, not an error.
    ///
    /// # Returns
    ///
    /// The number of items removed.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the delete fails.
    pub async fn delete_all_for_user(&self, owner: UserId) -> Result<u64, RepositoryError> {
        let result = sqlx::query("DELETE FROM cart_items WHERE owner_user_id = ?")
            .bind(owner.as_i64())
            .execute(self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}
