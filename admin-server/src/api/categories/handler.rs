//! Category API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::repository::{RepoError, category};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::ErrorCode;
use shared::models::{Category, CategoryCreate, CategoryUpdate};

/// GET /api/categories
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Category>>> {
    let categories = category::find_all(&state.pool).await?;
    Ok(Json(categories))
}

/// GET /api/categories/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Category>> {
    let found = category::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CategoryNotFound))?;
    Ok(Json(found))
}

/// POST /api/categories
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CategoryCreate>,
) -> AppResult<Json<Category>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    match category::create(&state.pool, payload).await {
        Ok(created) => Ok(Json(created)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::CategoryNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/categories/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CategoryUpdate>,
) -> AppResult<Json<Category>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    match category::update(&state.pool, id, payload).await {
        Ok(updated) => Ok(Json(updated)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::CategoryNotFound)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::CategoryNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/categories/:id - blocked while products reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let products = category::product_count(&state.pool, id).await?;
    if products > 0 {
        return Err(AppError::new(ErrorCode::CategoryInUse).with_detail("products", products));
    }

    let deleted = category::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    Ok(Json(true))
}
