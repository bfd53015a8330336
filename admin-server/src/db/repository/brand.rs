//! Brand Repository

use super::{RepoError, RepoResult};
use shared::models::{Brand, BrandCreate, BrandUpdate};
use sqlx::SqlitePool;

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<Brand>> {
    let rows = sqlx::query_as::<_, Brand>(
        "SELECT id, name, logo_url, created_at, updated_at FROM brand ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Brand>> {
    let row = sqlx::query_as::<_, Brand>(
        "SELECT id, name, logo_url, created_at, updated_at FROM brand WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: BrandCreate) -> RepoResult<Brand> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO brand (id, name, logo_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.logo_url)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create brand".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: BrandUpdate) -> RepoResult<Brand> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE brand SET name = COALESCE(?1, name), logo_url = COALESCE(?2, logo_url), updated_at = ?3 WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(&data.logo_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Brand {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Brand {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM brand WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of models referencing this brand
pub async fn model_count(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM model WHERE brand_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Number of products referencing this brand
pub async fn product_count(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product WHERE brand_id = ?")
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
    async fn create_find_update_delete() {
        let pool = test_pool().await;
        let brand = create(
            &pool,
            BrandCreate {
                name: "Bosch".into(),
                logo_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(brand.name, "Bosch");

        let updated = update(
            &pool,
            brand.id,
            BrandUpdate {
                name: Some("Bosch GmbH".into()),
                logo_url: Some("https://example.com/bosch.png".into()),
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.name, "Bosch GmbH");
        assert_eq!(updated.logo_url.as_deref(), Some("https://example.com/bosch.png"));

        assert!(delete(&pool, brand.id).await.unwrap());
        assert!(find_by_id(&pool, brand.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn duplicate_name_is_rejected() {
        let pool = test_pool().await;
        let data = BrandCreate {
            name: "Makita".into(),
            logo_url: None,
        };
        create(&pool, data.clone()).await.unwrap();
        let err = create(&pool, data).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn update_missing_brand_is_not_found() {
        let pool = test_pool().await;
        let err = update(
            &pool,
            999,
            BrandUpdate {
                name: Some("x".into()),
                logo_url: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, RepoError::NotFound(_)));
    }
}
