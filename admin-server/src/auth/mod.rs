//! Authentication
//!
//! JWT token service, explicit session store, and axum middleware.
//! A token is only accepted while its session is still live in the
//! [`SessionStore`]; logout revokes the session and the token with it.

pub mod jwt;
pub mod middleware;
pub mod session;

pub use jwt::{Claims, CurrentUser, JwtConfig, JwtError, JwtService};
pub use middleware::{require_admin, require_auth};
pub use session::{Session, SessionStore};
