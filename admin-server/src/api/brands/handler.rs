//! Brand API Handlers

use axum::{
    Json,
    extract::{Path, State},
};

use crate::api::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::repository::{RepoError, brand};
use crate::utils::validation::{MAX_NAME_LEN, MAX_URL_LEN, validate_optional_text, validate_required_text};
use shared::ErrorCode;
use shared::models::{Brand, BrandCreate, BrandUpdate};

fn validate_create(data: &BrandCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.logo_url, "logo_url", MAX_URL_LEN)
}

fn validate_update(data: &BrandUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.logo_url, "logo_url", MAX_URL_LEN)
}

/// GET /api/brands
pub async fn list(State(state): State<ServerState>) -> AppResult<Json<Vec<Brand>>> {
    let brands = brand::find_all(&state.pool).await?;
    Ok(Json(brands))
}

/// GET /api/brands/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Brand>> {
    let found = brand::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::BrandNotFound))?;
    Ok(Json(found))
}

/// POST /api/brands
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<BrandCreate>,
) -> AppResult<Json<Brand>> {
    validate_create(&payload)?;
    match brand::create(&state.pool, payload).await {
        Ok(created) => Ok(Json(created)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::BrandNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/brands/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<BrandUpdate>,
) -> AppResult<Json<Brand>> {
    validate_update(&payload)?;
    match brand::update(&state.pool, id, payload).await {
        Ok(updated) => Ok(Json(updated)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::BrandNotFound)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::BrandNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/brands/:id - blocked while models or products reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let models = brand::model_count(&state.pool, id).await?;
    let products = brand::product_count(&state.pool, id).await?;
    if models > 0 || products > 0 {
        return Err(AppError::new(ErrorCode::BrandInUse)
            .with_detail("models", models)
            .with_detail("products", products));
    }

    let deleted = brand::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::BrandNotFound));
    }
    Ok(Json(true))
}
