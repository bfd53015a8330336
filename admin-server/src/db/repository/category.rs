//! Category Repository

use super::{RepoError, RepoResult};
use shared::models::{Category, CategoryCreate, CategoryUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Category>> {
    let rows = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at, updated_at FROM category ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Category>> {
    let row = sqlx::query_as::<_, Category>(
        "SELECT id, name, created_at, updated_at FROM category WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CategoryCreate) -> RepoResult<Category> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query("INSERT INTO category (id, name, created_at, updated_at) VALUES (?1, ?2, ?3, ?3)")
        .bind(id)
        .bind(&data.name)
        .bind(now)
        .execute(pool)
        .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create category".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CategoryUpdate) -> RepoResult<Category> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE category SET name = COALESCE(?1, name), updated_at = ?2 WHERE id = ?3",
    )
    .bind(&data.name)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Category {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Category {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM category WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of products referencing this category
pub async fn product_count(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product WHERE category_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    #[tokio::test]
    async fn crud_roundtrip() {
        let pool = test_pool().await;
        let cat = create(&pool, CategoryCreate { name: "Drills".into() })
            .await
            .unwrap();
        let updated = update(&pool, cat.id, CategoryUpdate { name: Some("Power Drills".into()) })
            .await
            .unwrap();
        assert_eq!(updated.name, "Power Drills");
        assert!(delete(&pool, cat.id).await.unwrap());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let pool = test_pool().await;
        create(&pool, CategoryCreate { name: "Saws".into() }).await.unwrap();
        let err = create(&pool, CategoryCreate { name: "Saws".into() })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
