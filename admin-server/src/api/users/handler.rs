//! User API Handlers
//!
//! Account management. The `password_hash` field never serializes, so the
//! `User` model is safe to return directly.

use axum::{
    Extension, Json,
    extract::{Path, State},
};

use crate::api::{AppError, AppResult};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, user};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_PASSWORD_LEN, validate_email, validate_required_text,
};
use shared::ErrorCode;
use shared::models::{User, UserCreate, UserUpdate};

const MIN_PASSWORD_LEN: usize = 6;

fn validate_password(password: &str) -> Result<(), AppError> {
    if password.len() < MIN_PASSWORD_LEN || password.len() > MAX_PASSWORD_LEN {
        return Err(AppError::validation(format!(
            "password must be between {MIN_PASSWORD_LEN} and {MAX_PASSWORD_LEN} characters"
        )));
    }
    Ok(())
}

/// GET /api/users
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<User>>> {
    let users = user::find_all(&state.pool).await?;
    Ok(Json(users))
}

/// GET /api/users/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<User>> {
    let found = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;
    Ok(Json(found))
}

/// POST /api/users
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<UserCreate>,
) -> AppResult<Json<User>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_email(&payload.email)?;
    validate_password(&payload.password)?;
    match user::create(&state.pool, payload).await {
        Ok(created) => Ok(Json(created)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::UserEmailExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/users/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<UserUpdate>,
) -> AppResult<Json<User>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(email) = &payload.email {
        validate_email(email)?;
    }
    if let Some(password) = &payload.password {
        validate_password(password)?;
    }

    let deactivated = payload.is_active == Some(false);

    let updated = match user::update(&state.pool, id, payload).await {
        Ok(updated) => updated,
        Err(RepoError::NotFound(_)) => return Err(AppError::new(ErrorCode::UserNotFound)),
        Err(RepoError::Duplicate(_)) => return Err(AppError::new(ErrorCode::UserEmailExists)),
        Err(e) => return Err(e.into()),
    };

    // A disabled account must not keep working on an old token
    if deactivated {
        state.sessions.revoke_user(id);
    }

    Ok(Json(updated))
}

/// DELETE /api/users/:id
///
/// Self-deletion and removing the last active admin are both rejected.
pub async fn delete(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    if id == current_user.id {
        return Err(AppError::new(ErrorCode::CannotDeleteSelf));
    }

    let target = user::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    if target.role.is_admin()
        && target.is_active
        && user::active_admin_count(&state.pool).await? <= 1
    {
        return Err(AppError::new(ErrorCode::CannotDeleteLastAdmin));
    }

    let deleted = user::delete(&state.pool, id).await?;
    if deleted {
        state.sessions.revoke_user(id);
    }
    Ok(Json(deleted))
}
