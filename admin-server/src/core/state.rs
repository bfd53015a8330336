//! Server State
//!
//! Shared handles for everything the request handlers need. Cloning is
//! cheap; the pool and services are all reference counted.

use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::{JwtService, SessionStore};
use crate::core::Config;
use crate::db::{DbService, repository::user};

#[derive(Clone)]
pub struct ServerState {
    /// Server configuration
    pub config: Config,
    /// SQLite connection pool
    pub pool: SqlitePool,
    /// JWT signing and validation
    pub jwt_service: Arc<JwtService>,
    /// Live login sessions; a token is only honored while its session exists
    pub sessions: Arc<SessionStore>,
}

impl ServerState {
    pub fn new(
        config: Config,
        pool: SqlitePool,
        jwt_service: Arc<JwtService>,
        sessions: Arc<SessionStore>,
    ) -> Self {
        Self {
            config,
            pool,
            jwt_service,
            sessions,
        }
    }

    /// Initialize server state in order:
    ///
    /// 1. Work directory structure
    /// 2. Database (pool + migrations)
    /// 3. JWT service and session store
    /// 4. Bootstrap admin account (only when the user table is empty)
    ///
    /// # Panics
    ///
    /// Panics when the work directory or database cannot be initialized;
    /// the server cannot run without them.
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir_structure()
            .expect("Failed to create work directory structure");

        let db_path = config.database_file();
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));
        let sessions = Arc::new(SessionStore::new());

        if let Err(e) =
            user::bootstrap_admin(&db.pool, &config.admin_email, &config.admin_password).await
        {
            tracing::error!("Failed to bootstrap admin account: {e}");
        }

        Self::new(config.clone(), db.pool, jwt_service, sessions)
    }
}
