//! Model API Handlers
//!
//! Models are product lines scoped to a brand; (name, brand) is unique.

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::repository::{RepoError, brand, model};
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};
use shared::ErrorCode;
use shared::models::{ModelCreate, ModelUpdate, ModelWithBrand};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub brand_id: Option<i64>,
}

async fn ensure_brand_exists(state: &ServerState, brand_id: i64) -> Result<(), AppError> {
    brand::find_by_id(&state.pool, brand_id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::new(ErrorCode::BrandNotFound))
}

/// GET /api/models?brand_id=x
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ModelWithBrand>>> {
    let models = match query.brand_id {
        Some(brand_id) => model::find_by_brand(&state.pool, brand_id).await?,
        None => model::find_all(&state.pool).await?,
    };
    Ok(Json(models))
}

/// GET /api/models/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ModelWithBrand>> {
    let found = model::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ModelNotFound))?;
    Ok(Json(found))
}

/// POST /api/models
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ModelCreate>,
) -> AppResult<Json<ModelWithBrand>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    ensure_brand_exists(&state, payload.brand_id).await?;
    match model::create(&state.pool, payload).await {
        Ok(created) => Ok(Json(created)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::ModelNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/models/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ModelUpdate>,
) -> AppResult<Json<ModelWithBrand>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    if let Some(brand_id) = payload.brand_id {
        ensure_brand_exists(&state, brand_id).await?;
    }
    match model::update(&state.pool, id, payload).await {
        Ok(updated) => Ok(Json(updated)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::ModelNotFound)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::ModelNameExists)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/models/:id - blocked while products reference it
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let products = model::product_count(&state.pool, id).await?;
    if products > 0 {
        return Err(AppError::new(ErrorCode::ModelInUse).with_detail("products", products));
    }

    let deleted = model::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ModelNotFound));
    }
    Ok(Json(true))
}
