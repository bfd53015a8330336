//! Product Model

use serde::{Deserialize, Serialize};

/// Product entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Product {
    pub id: i64,
    pub name: String,
    /// Manufacturer part code ("" when unknown)
    pub part_code: String,
    pub brand_id: i64,
    pub model_id: i64,
    pub category_id: i64,
    /// Prices in currency unit
    pub purchase_price: f64,
    pub dealer_price: f64,
    pub end_user_price: f64,
    /// GST percentage (0-100)
    pub gst: f64,
    pub photo_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create product payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProductCreate {
    pub name: String,
    pub part_code: Option<String>,
    pub brand_id: i64,
    pub model_id: i64,
    pub category_id: i64,
    pub purchase_price: f64,
    pub dealer_price: f64,
    pub end_user_price: f64,
    /// Defaults to 18 when absent
    pub gst: Option<f64>,
    /// Defaults to a placeholder image URL when absent
    pub photo_url: Option<String>,
}

/// Update product payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProductUpdate {
    pub name: Option<String>,
    pub part_code: Option<String>,
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub category_id: Option<i64>,
    pub purchase_price: Option<f64>,
    pub dealer_price: Option<f64>,
    pub end_user_price: Option<f64>,
    pub gst: Option<f64>,
    pub photo_url: Option<String>,
}

/// Product with brand/model/category names (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ProductWithRefs {
    pub id: i64,
    pub name: String,
    pub part_code: String,
    pub brand_id: i64,
    pub brand_name: String,
    pub model_id: i64,
    pub model_name: String,
    pub category_id: i64,
    pub category_name: String,
    pub purchase_price: f64,
    pub dealer_price: f64,
    pub end_user_price: f64,
    pub gst: f64,
    pub photo_url: String,
    pub created_at: i64,
    pub updated_at: i64,
}
