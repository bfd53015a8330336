//! Model Repository

use super::{RepoError, RepoResult};
use shared::models::{Model, ModelCreate, ModelUpdate, ModelWithBrand};
use sqlx::SqlitePool;

const MODEL_WITH_BRAND_SELECT: &str = "SELECT m.id, m.name, m.brand_id, b.name as brand_name, m.created_at, m.updated_at FROM model m JOIN brand b ON m.brand_id = b.id";

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ModelWithBrand>> {
    let sql = format!("{} ORDER BY b.name, m.name", MODEL_WITH_BRAND_SELECT);
    let rows = sqlx::query_as::<_, ModelWithBrand>(&sql)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_brand(pool: &SqlitePool, brand_id: i64) -> RepoResult<Vec<ModelWithBrand>> {
    let sql = format!("{} WHERE m.brand_id = ? ORDER BY m.name", MODEL_WITH_BRAND_SELECT);
    let rows = sqlx::query_as::<_, ModelWithBrand>(&sql)
        .bind(brand_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ModelWithBrand>> {
    let sql = format!("{} WHERE m.id = ?", MODEL_WITH_BRAND_SELECT);
    let row = sqlx::query_as::<_, ModelWithBrand>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ModelCreate) -> RepoResult<ModelWithBrand> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO model (id, name, brand_id, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?4)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(data.brand_id)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create model".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ModelUpdate) -> RepoResult<ModelWithBrand> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE model SET name = COALESCE(?1, name), brand_id = COALESCE(?2, brand_id), updated_at = ?3 WHERE id = ?4",
    )
    .bind(&data.name)
    .bind(data.brand_id)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Model {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Model {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM model WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of products referencing this model
pub async fn product_count(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM product WHERE model_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

/// Plain rows without the brand join (used by the import reconciler snapshot)
pub async fn find_all_plain(pool: &SqlitePool) -> RepoResult<Vec<Model>> {
    let rows = sqlx::query_as::<_, Model>(
        "SELECT id, name, brand_id, created_at, updated_at FROM model ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::brand;
    use crate::db::test_support::test_pool;
    use shared::models::BrandCreate;

    async fn seed_brand(pool: &SqlitePool, name: &str) -> i64 {
        brand::create(
            pool,
            BrandCreate {
                name: name.into(),
                logo_url: None,
            },
        )
        .await
        .unwrap()
        .id
    }

    #[tokio::test]
    async fn same_name_allowed_under_different_brands() {
        let pool = test_pool().await;
        let b1 = seed_brand(&pool, "Bosch").await;
        let b2 = seed_brand(&pool, "Makita").await;

        create(&pool, ModelCreate { name: "GSB 500".into(), brand_id: b1 })
            .await
            .unwrap();
        create(&pool, ModelCreate { name: "GSB 500".into(), brand_id: b2 })
            .await
            .unwrap();

        // Duplicate within the same brand is rejected
        let err = create(&pool, ModelCreate { name: "GSB 500".into(), brand_id: b1 })
            .await
            .unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }

    #[tokio::test]
    async fn filter_by_brand() {
        let pool = test_pool().await;
        let b1 = seed_brand(&pool, "Bosch").await;
        let b2 = seed_brand(&pool, "Makita").await;
        create(&pool, ModelCreate { name: "A".into(), brand_id: b1 }).await.unwrap();
        create(&pool, ModelCreate { name: "B".into(), brand_id: b2 }).await.unwrap();

        let bosch_models = find_by_brand(&pool, b1).await.unwrap();
        assert_eq!(bosch_models.len(), 1);
        assert_eq!(bosch_models[0].brand_name, "Bosch");
    }
}
