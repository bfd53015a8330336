//! Model (product line) Model

use serde::{Deserialize, Serialize};

/// Model entity (a product line under a brand)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Model {
    pub id: i64,
    pub name: String,
    pub brand_id: i64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create model payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelCreate {
    pub name: String,
    pub brand_id: i64,
}

/// Update model payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelUpdate {
    pub name: Option<String>,
    pub brand_id: Option<i64>,
}

/// Model with brand info (for list/detail views)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ModelWithBrand {
    pub id: i64,
    pub name: String,
    pub brand_id: i64,
    pub brand_name: String,
    pub created_at: i64,
    pub updated_at: i64,
}
