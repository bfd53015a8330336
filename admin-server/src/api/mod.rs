//! API route modules
//!
//! # Structure
//!
//! - [`auth`] - login / me / logout
//! - [`health`] - health check
//! - [`brands`] - brand management
//! - [`models`] - model (product line) management
//! - [`categories`] - category management
//! - [`products`] - product management and bulk CSV import
//! - [`customers`] - customer management
//! - [`orders`] - order management
//! - [`users`] - account management (admin only)

pub mod auth;
pub mod health;

pub mod brands;
pub mod categories;
pub mod customers;
pub mod models;
pub mod orders;
pub mod products;
pub mod users;

// Re-export common types for handlers
pub use shared::error::{AppError, AppResult};
