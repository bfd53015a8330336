//! Customer API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{AppError, AppResult};
use crate::core::ServerState;
use crate::db::repository::{RepoError, customer};
use crate::utils::validation::{
    MAX_ADDRESS_LEN, MAX_NAME_LEN, MAX_SHORT_TEXT_LEN, validate_email, validate_optional_text,
    validate_required_text,
};
use shared::ErrorCode;
use shared::models::{Customer, CustomerCreate, CustomerType, CustomerUpdate};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(rename = "type")]
    pub customer_type: Option<CustomerType>,
    pub search: Option<String>,
}

fn validate_contact(
    email: &Option<String>,
    phone: &Option<String>,
    address: &Option<String>,
) -> Result<(), AppError> {
    if let Some(email) = email
        && !email.is_empty()
    {
        validate_email(email)?;
    }
    validate_optional_text(phone, "phone", MAX_SHORT_TEXT_LEN)?;
    validate_optional_text(address, "address", MAX_ADDRESS_LEN)
}

/// GET /api/customers?type=DEALER&search=xxx
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<Customer>>> {
    let filter = customer::CustomerFilter {
        customer_type: query.customer_type,
        search: query.search,
    };
    let customers = customer::find_filtered(&state.pool, &filter).await?;
    Ok(Json(customers))
}

/// GET /api/customers/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<Customer>> {
    let found = customer::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;
    Ok(Json(found))
}

/// POST /api/customers
pub async fn create(
    State(state): State<ServerState>,
    Json(payload): Json<CustomerCreate>,
) -> AppResult<Json<Customer>> {
    validate_required_text(&payload.name, "name", MAX_NAME_LEN)?;
    validate_contact(&payload.email, &payload.phone, &payload.address)?;
    match customer::create(&state.pool, payload).await {
        Ok(created) => Ok(Json(created)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::CustomerEmailExists)),
        Err(e) => Err(e.into()),
    }
}

/// PUT /api/customers/:id
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<CustomerUpdate>,
) -> AppResult<Json<Customer>> {
    if let Some(name) = &payload.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    validate_contact(&payload.email, &payload.phone, &payload.address)?;
    match customer::update(&state.pool, id, payload).await {
        Ok(updated) => Ok(Json(updated)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::CustomerNotFound)),
        Err(RepoError::Duplicate(_)) => Err(AppError::new(ErrorCode::CustomerEmailExists)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/customers/:id - blocked while orders reference the customer
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let orders = customer::order_count(&state.pool, id).await?;
    if orders > 0 {
        return Err(AppError::new(ErrorCode::CustomerHasOrders).with_detail("orders", orders));
    }

    let deleted = customer::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::CustomerNotFound));
    }
    Ok(Json(true))
}
