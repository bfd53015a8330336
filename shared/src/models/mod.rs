//! Data models
//!
//! Shared between admin-server and frontend (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All IDs are `i64` (SQLite INTEGER PRIMARY KEY).

pub mod brand;
pub mod category;
pub mod customer;
pub mod model;
pub mod order;
pub mod product;
pub mod user;

// Re-exports
pub use brand::*;
pub use category::*;
pub use customer::*;
pub use model::*;
pub use order::*;
pub use product::*;
pub use user::*;
