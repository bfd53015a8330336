//! Shared types for the Pricebook admin backend
//!
//! Domain models, the unified error system, API response structures,
//! and id/time utilities used by the server crate.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};
pub use serde::{Deserialize, Serialize};
