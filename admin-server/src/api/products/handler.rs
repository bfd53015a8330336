//! Product API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::repository::{RepoError, brand, category, model, product};
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, MAX_URL_LEN, validate_gst, validate_optional_text,
    validate_price, validate_required_text,
};
use shared::ErrorCode;
use shared::models::{ProductCreate, ProductUpdate, ProductWithRefs};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub category_id: Option<i64>,
}

async fn ensure_refs_exist(
    state: &ServerState,
    brand_id: Option<i64>,
    model_id: Option<i64>,
    category_id: Option<i64>,
) -> Result<(), AppError> {
    if let Some(id) = brand_id
        && brand::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::BrandNotFound));
    }
    if let Some(id) = model_id {
        let model = model::find_by_id(&state.pool, id)
            .await?
            .ok_or_else(|| AppError::new(ErrorCode::ModelNotFound))?;
        // A model must belong to the product's brand
        if let Some(brand_id) = brand_id
            && model.brand_id != brand_id
        {
            return Err(AppError::validation(format!(
                "Model {id} does not belong to brand {brand_id}"
            )));
        }
    }
    if let Some(id) = category_id
        && category::find_by_id(&state.pool, id).await?.is_none()
    {
        return Err(AppError::new(ErrorCode::CategoryNotFound));
    }
    Ok(())
}

fn validate_create(data: &ProductCreate) -> Result<(), AppError> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.part_code, "part_code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.photo_url, "photo_url", MAX_URL_LEN)?;
    validate_price(data.purchase_price, "purchase_price")?;
    validate_price(data.dealer_price, "dealer_price")?;
    validate_price(data.end_user_price, "end_user_price")?;
    if let Some(gst) = data.gst {
        validate_gst(gst)?;
    }
    Ok(())
}

fn validate_update(data: &ProductUpdate) -> Result<(), AppError> {
    if let Some(name) = &data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_optional_text(&data.part_code, "part_code", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(&data.photo_url, "photo_url", MAX_URL_LEN)?;
    for (value, field) in [
        (data.purchase_price, "purchase_price"),
        (data.dealer_price, "dealer_price"),
        (data.end_user_price, "end_user_price"),
    ] {
        if let Some(v) = value {
            validate_price(v, field)?;
        }
    }
    if let Some(gst) = data.gst {
        validate_gst(gst)?;
    }
    Ok(())
}

/// GET /api/products?brand_id=x&model_id=y&category_id=z
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<ProductWithRefs>>> {
    let filter = product::ProductFilter {
        brand_id: query.brand_id,
        model_id: query.model_id,
        category_id: query.category_id,
    };
    let products = product::find_filtered(&state.pool, &filter).await?;
    Ok(Json(products))
}

/// GET /api/products/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<ProductWithRefs>> {
    let found = product::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::ProductNotFound))?;
    Ok(Json(found))
}

/// POST /api/products
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<ProductCreate>,
) -> AppResult<Json<ProductWithRefs>> {
    validate_create(&payload)?;
    ensure_refs_exist(
        &state,
        Some(payload.brand_id),
        Some(payload.model_id),
        Some(payload.category_id),
    )
    .await?;
    let created = product::create(&state.pool, payload).await?;
    Ok(Json(created))
}

/// PUT /api/products/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<ProductUpdate>,
) -> AppResult<Json<ProductWithRefs>> {
    validate_update(&payload)?;
    ensure_refs_exist(&state, payload.brand_id, payload.model_id, payload.category_id).await?;
    match product::update(&state.pool, id, payload).await {
        Ok(updated) => Ok(Json(updated)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::ProductNotFound)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/products/:id
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = product::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::ProductNotFound));
    }
    Ok(Json(true))
}
