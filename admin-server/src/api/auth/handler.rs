//! Authentication Handlers
//!
//! Login, current-user lookup, and logout.

use std::time::Duration;

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};

use crate::api::{AppError, AppResult};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::user;
use shared::models::{User, UserRole};

/// Fixed delay for authentication to prevent timing attacks
const AUTH_FIXED_DELAY_MS: u64 = 500;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            name: user.name.clone(),
            email: user.email.clone(),
            role: user.role,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserInfo,
}

/// POST /api/auth/login
///
/// Verifies credentials, opens a session, and returns a JWT bound to it.
/// The error message never distinguishes unknown email from wrong password.
pub async fn login(
    State(state): State<ServerState>,
    Json(req): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let account = user::find_by_email(&state.pool, &req.email).await?;

    // Fixed delay before inspecting the result
    tokio::time::sleep(Duration::from_millis(AUTH_FIXED_DELAY_MS)).await;

    let account = match account {
        Some(a) => a,
        None => {
            tracing::warn!(target: "security", email = %req.email, "Login failed - user not found");
            return Err(AppError::invalid_credentials());
        }
    };

    if !account.is_active {
        tracing::warn!(target: "security", email = %req.email, "Login rejected - account disabled");
        return Err(AppError::new(shared::ErrorCode::AccountDisabled));
    }

    let password_valid = user::verify_password(&req.password, &account.password_hash)
        .map_err(|e| AppError::internal(format!("Password verification failed: {e}")))?;
    if !password_valid {
        tracing::warn!(target: "security", email = %req.email, "Login failed - invalid credentials");
        return Err(AppError::invalid_credentials());
    }

    let session = state
        .sessions
        .create(account.id, state.jwt_service.config.expiration_minutes);
    let token = state
        .jwt_service
        .generate_token(&account, session.id)
        .map_err(|e| AppError::internal(format!("Token generation failed: {e}")))?;

    tracing::info!(user_id = account.id, "User logged in");

    Ok(Json(LoginResponse {
        token,
        user: UserInfo::from(&account),
    }))
}

/// GET /api/auth/me - the authenticated account, fresh from storage
pub async fn me(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<UserInfo>> {
    let account = user::find_by_id(&state.pool, current_user.id)
        .await?
        .ok_or_else(|| AppError::new(shared::ErrorCode::UserNotFound))?;
    Ok(Json(UserInfo::from(&account)))
}

/// POST /api/auth/logout - tears down the session; the JWT dies with it
pub async fn logout(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
) -> AppResult<Json<bool>> {
    let revoked = state.sessions.revoke(current_user.session_id);
    tracing::info!(user_id = current_user.id, "User logged out");
    Ok(Json(revoked))
}
