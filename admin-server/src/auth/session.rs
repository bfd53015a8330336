//! Session Store
//!
//! Sessions are created at login and torn down at logout. Token validation
//! consults this store, so revoking a session invalidates its JWT even
//! before the token expires.

use dashmap::DashMap;
use shared::util::{now_millis, snowflake_id};

/// A live login session
#[derive(Debug, Clone)]
pub struct Session {
    pub id: i64,
    pub user_id: i64,
    pub created_at: i64,
    pub expires_at: i64,
}

/// In-memory session store (DashMap keyed by session id)
#[derive(Debug, Default)]
pub struct SessionStore {
    sessions: DashMap<i64, Session>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self {
            sessions: DashMap::new(),
        }
    }

    /// Create a new session for a user, valid for `ttl_minutes`
    pub fn create(&self, user_id: i64, ttl_minutes: i64) -> Session {
        let now = now_millis();
        let session = Session {
            id: snowflake_id(),
            user_id,
            created_at: now,
            expires_at: now + ttl_minutes * 60_000,
        };
        self.sessions.insert(session.id, session.clone());
        session
    }

    /// Check that a session exists, belongs to the user, and has not expired.
    /// Expired sessions are removed as a side effect.
    pub fn is_live(&self, session_id: i64, user_id: i64) -> bool {
        let expired = match self.sessions.get(&session_id) {
            Some(s) => {
                if s.user_id != user_id {
                    return false;
                }
                s.expires_at <= now_millis()
            }
            None => return false,
        };
        if expired {
            self.sessions.remove(&session_id);
            return false;
        }
        true
    }

    /// Revoke a single session (logout)
    pub fn revoke(&self, session_id: i64) -> bool {
        self.sessions.remove(&session_id).is_some()
    }

    /// Revoke every session belonging to a user (account disabled/deleted)
    pub fn revoke_user(&self, user_id: i64) {
        self.sessions.retain(|_, s| s.user_id != user_id);
    }

    /// Drop all expired sessions
    pub fn purge_expired(&self) {
        let now = now_millis();
        self.sessions.retain(|_, s| s.expires_at > now);
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
