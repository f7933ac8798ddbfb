//! Business-logic services.
//!
//! Services own validation and orchestration; they hold repository handles
//! and are constructed per request from the shared pool (no global state).

pub mod auth;
pub mod cart;

pub use auth::{AuthError, AuthService};
pub use cart::{CartError, CartService};
