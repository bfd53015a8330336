//! Pricebook Admin Server
//!
//! Backend for the product catalog and order management admin panel.
//!
//! # Module structure
//!
//! ```text
//! admin-server/src/
//! ├── core/          # configuration, state, HTTP server
//! ├── auth/          # JWT auth, sessions, middleware
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # SQLite pool and repositories
//! ├── pricing/       # order total calculator
//! ├── imports/       # bulk CSV product import
//! └── utils/         # logging, validation, misc helpers
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod imports;
pub mod pricing;
pub mod utils;

// Re-export common types
pub use auth::{CurrentUser, JwtService, SessionStore};
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use shared::error::{ApiResponse, AppError, AppResult, ErrorCategory, ErrorCode};

pub use utils::logger::{init_logger, init_logger_with_file};

/// Initialize logging from the resolved configuration.
///
/// File logging only kicks in for production with an existing log dir;
/// development stays on stderr.
pub fn setup_environment(config: &Config) {
    let log_dir = config.log_dir();
    if config.is_production() && log_dir.exists() {
        init_logger_with_file(Some(&config.log_level), log_dir.to_str());
    } else {
        init_logger_with_file(Some(&config.log_level), None);
    }
}
