//! Order API Handlers
//!
//! Orders snapshot their prices at creation time; the calculator resolves
//! the customer's tier and the flat order GST, and the result is stored
//! as-is. Later catalog price changes never touch existing orders.

use std::collections::HashMap;

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;

use crate::api::{AppError, AppResult};
use crate::auth::CurrentUser;
use crate::core::ServerState;
use crate::db::repository::{RepoError, customer, order, product};
use crate::pricing::{self, PricingError};
use crate::utils::validation::{MAX_NOTE_LEN, validate_optional_text};
use shared::ErrorCode;
use shared::models::{OrderCreate, OrderStatus, OrderStatusUpdate, OrderWithDetails, Product};

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
}

/// GET /api/orders?customer_id=x&status=PENDING&limit=50 - newest first
pub async fn list(
    State(state): State<ServerState>,
    Query(query): Query<ListQuery>,
) -> AppResult<Json<Vec<OrderWithDetails>>> {
    let filter = order::OrderFilter {
        customer_id: query.customer_id,
        status: query.status,
        limit: query.limit,
    };
    let orders = order::find_filtered(&state.pool, &filter).await?;
    Ok(Json(orders))
}

/// GET /api/orders/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<OrderWithDetails>> {
    let found = order::find_by_id(&state.pool, id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(Json(found))
}

/// POST /api/orders
pub async fn create(
    State(state): State<ServerState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(payload): Json<OrderCreate>,
) -> AppResult<Json<OrderWithDetails>> {
    if payload.items.is_empty() {
        return Err(AppError::new(ErrorCode::OrderEmpty));
    }
    for line in &payload.items {
        if line.quantity <= 0 {
            return Err(AppError::validation(format!(
                "quantity must be positive, got {} for product {}",
                line.quantity, line.product_id
            )));
        }
    }
    validate_optional_text(&payload.notes, "notes", MAX_NOTE_LEN)?;

    let buyer = customer::find_by_id(&state.pool, payload.customer_id)
        .await?
        .ok_or_else(|| AppError::new(ErrorCode::CustomerNotFound))?;

    // Catalog snapshot for the requested lines only
    let mut products: HashMap<i64, Product> = HashMap::new();
    for line in &payload.items {
        if let Some(p) = product::find_plain_by_id(&state.pool, line.product_id).await? {
            products.insert(p.id, p);
        }
    }

    let priced =
        pricing::price_order(&payload.items, Some(&buyer), &products).map_err(|e| match e {
            PricingError::ProductNotFound(id) => {
                AppError::new(ErrorCode::ProductNotFound).with_detail("product_id", id)
            }
        })?;

    let new_order = order::NewOrder {
        customer_id: buyer.id,
        user_id: current_user.id,
        notes: payload.notes,
        total_amount: priced.total_amount,
        gst_amount: priced.gst_amount,
        net_amount: priced.net_amount,
        items: priced
            .items
            .into_iter()
            .map(|item| order::NewOrderItem {
                product_id: item.product_id,
                quantity: item.quantity,
                unit_price: item.unit_price,
                total_price: item.total_price,
            })
            .collect(),
    };

    let created = order::create(&state.pool, new_order).await?;
    tracing::info!(
        order_number = %created.order_number,
        net_amount = created.net_amount,
        "Order created"
    );
    Ok(Json(created))
}

/// PUT /api/orders/:id - status transitions only; amounts are immutable
pub async fn update_status(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
    Json(payload): Json<OrderStatusUpdate>,
) -> AppResult<Json<OrderWithDetails>> {
    match order::update_status(&state.pool, id, payload.status).await {
        Ok(updated) => Ok(Json(updated)),
        Err(RepoError::NotFound(_)) => Err(AppError::new(ErrorCode::OrderNotFound)),
        Err(e) => Err(e.into()),
    }
}

/// DELETE /api/orders/:id - line items cascade
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<i64>,
) -> AppResult<Json<bool>> {
    let deleted = order::delete(&state.pool, id).await?;
    if !deleted {
        return Err(AppError::new(ErrorCode::OrderNotFound));
    }
    Ok(Json(true))
}
