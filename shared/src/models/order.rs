//! Order Model

use serde::{Deserialize, Serialize};

/// Order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "SCREAMING_SNAKE_CASE"))]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

/// Order entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Order {
    pub id: i64,
    /// Human-facing number, `ORD-YYMMDD-nnn`
    pub order_number: String,
    pub customer_id: i64,
    pub user_id: i64,
    pub status: OrderStatus,
    /// Amounts in currency unit, fixed at creation time
    pub total_amount: f64,
    pub gst_amount: f64,
    pub net_amount: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Order line item (immutable price snapshot)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItem {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Order item with product info (for detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderItemWithProduct {
    pub id: i64,
    pub order_id: i64,
    pub product_id: i64,
    pub product_name: String,
    pub part_code: String,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Order with customer info and line items (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct OrderWithDetails {
    pub id: i64,
    pub order_number: String,
    pub customer_id: i64,
    pub customer_name: String,
    pub user_id: i64,
    pub user_name: String,
    pub status: OrderStatus,
    pub total_amount: f64,
    pub gst_amount: f64,
    pub net_amount: f64,
    pub notes: Option<String>,
    pub created_at: i64,
    pub updated_at: i64,

    // -- Populated by application code, skipped by FromRow --
    #[cfg_attr(feature = "db", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<OrderItemWithProduct>,
}

/// One requested line of a new order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLineInput {
    pub product_id: i64,
    pub quantity: i64,
}

/// Create order payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub customer_id: i64,
    pub items: Vec<OrderLineInput>,
    pub notes: Option<String>,
}

/// Status-only order update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderStatusUpdate {
    pub status: OrderStatus,
}
