//! Product Repository

use super::{RepoError, RepoResult};
use shared::models::{Product, ProductCreate, ProductUpdate, ProductWithRefs};
use sqlx::SqlitePool;

const PRODUCT_WITH_REFS_SELECT: &str = "SELECT p.id, p.name, p.part_code, p.brand_id, b.name as brand_name, p.model_id, m.name as model_name, p.category_id, c.name as category_name, p.purchase_price, p.dealer_price, p.end_user_price, p.gst, p.photo_url, p.created_at, p.updated_at FROM product p JOIN brand b ON p.brand_id = b.id JOIN model m ON p.model_id = m.id JOIN category c ON p.category_id = c.id";

/// Optional reference filters for product listing
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub category_id: Option<i64>,
}

pub async fn find_filtered(
    pool: &SqlitePool,
    filter: &ProductFilter,
) -> RepoResult<Vec<ProductWithRefs>> {
    let mut sql = String::from(PRODUCT_WITH_REFS_SELECT);
    let mut clauses = Vec::new();
    if filter.brand_id.is_some() {
        clauses.push("p.brand_id = ?");
    }
    if filter.model_id.is_some() {
        clauses.push("p.model_id = ?");
    }
    if filter.category_id.is_some() {
        clauses.push("p.category_id = ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY p.name");

    let mut query = sqlx::query_as::<_, ProductWithRefs>(&sql);
    if let Some(id) = filter.brand_id {
        query = query.bind(id);
    }
    if let Some(id) = filter.model_id {
        query = query.bind(id);
    }
    if let Some(id) = filter.category_id {
        query = query.bind(id);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<ProductWithRefs>> {
    find_filtered(pool, &ProductFilter::default()).await
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<ProductWithRefs>> {
    let sql = format!("{} WHERE p.id = ?", PRODUCT_WITH_REFS_SELECT);
    let row = sqlx::query_as::<_, ProductWithRefs>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Plain rows without joins (pricing lookups and the import snapshot)
pub async fn find_all_plain(pool: &SqlitePool) -> RepoResult<Vec<Product>> {
    let rows = sqlx::query_as::<_, Product>(
        "SELECT id, name, part_code, brand_id, model_id, category_id, purchase_price, dealer_price, end_user_price, gst, photo_url, created_at, updated_at FROM product ORDER BY name",
    )
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn find_plain_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Product>> {
    let row = sqlx::query_as::<_, Product>(
        "SELECT id, name, part_code, brand_id, model_id, category_id, purchase_price, dealer_price, end_user_price, gst, photo_url, created_at, updated_at FROM product WHERE id = ?",
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: ProductCreate) -> RepoResult<ProductWithRefs> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let part_code = data.part_code.unwrap_or_default();
    let gst = data.gst.unwrap_or(18.0);
    let photo_url = data
        .photo_url
        .unwrap_or_else(|| crate::utils::placeholder_photo_url(&data.name));
    sqlx::query(
        "INSERT INTO product (id, name, part_code, brand_id, model_id, category_id, purchase_price, dealer_price, end_user_price, gst, photo_url, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?12)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&part_code)
    .bind(data.brand_id)
    .bind(data.model_id)
    .bind(data.category_id)
    .bind(data.purchase_price)
    .bind(data.dealer_price)
    .bind(data.end_user_price)
    .bind(gst)
    .bind(&photo_url)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create product".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: ProductUpdate) -> RepoResult<ProductWithRefs> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE product SET name = COALESCE(?1, name), part_code = COALESCE(?2, part_code), brand_id = COALESCE(?3, brand_id), model_id = COALESCE(?4, model_id), category_id = COALESCE(?5, category_id), purchase_price = COALESCE(?6, purchase_price), dealer_price = COALESCE(?7, dealer_price), end_user_price = COALESCE(?8, end_user_price), gst = COALESCE(?9, gst), photo_url = COALESCE(?10, photo_url), updated_at = ?11 WHERE id = ?12",
    )
    .bind(&data.name)
    .bind(&data.part_code)
    .bind(data.brand_id)
    .bind(data.model_id)
    .bind(data.category_id)
    .bind(data.purchase_price)
    .bind(data.dealer_price)
    .bind(data.end_user_price)
    .bind(data.gst)
    .bind(&data.photo_url)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Product {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Product {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM product WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{brand, category, model};
    use crate::db::test_support::test_pool;
    use shared::models::{BrandCreate, CategoryCreate, ModelCreate};

    async fn seed_refs(pool: &SqlitePool) -> (i64, i64, i64) {
        let b = brand::create(pool, BrandCreate { name: "Bosch".into(), logo_url: None })
            .await
            .unwrap();
        let m = model::create(pool, ModelCreate { name: "GSB 500".into(), brand_id: b.id })
            .await
            .unwrap();
        let c = category::create(pool, CategoryCreate { name: "Drills".into() })
            .await
            .unwrap();
        (b.id, m.id, c.id)
    }

    fn product_payload(name: &str, brand_id: i64, model_id: i64, category_id: i64) -> ProductCreate {
        ProductCreate {
            name: name.into(),
            part_code: None,
            brand_id,
            model_id,
            category_id,
            purchase_price: 80.0,
            dealer_price: 100.0,
            end_user_price: 120.0,
            gst: None,
            photo_url: None,
        }
    }

    #[tokio::test]
    async fn create_applies_defaults() {
        let pool = test_pool().await;
        let (b, m, c) = seed_refs(&pool).await;
        let product = create(&pool, product_payload("Impact Drill", b, m, c))
            .await
            .unwrap();

        assert_eq!(product.gst, 18.0);
        assert_eq!(product.part_code, "");
        assert!(product.photo_url.contains("Impact%20Drill"));
        assert_eq!(product.brand_name, "Bosch");
    }

    #[tokio::test]
    async fn filter_by_references() {
        let pool = test_pool().await;
        let (b, m, c) = seed_refs(&pool).await;
        create(&pool, product_payload("P1", b, m, c)).await.unwrap();
        create(&pool, product_payload("P2", b, m, c)).await.unwrap();

        let all = find_filtered(&pool, &ProductFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let by_brand = find_filtered(
            &pool,
            &ProductFilter { brand_id: Some(b), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(by_brand.len(), 2);

        let none = find_filtered(
            &pool,
            &ProductFilter { brand_id: Some(999), ..Default::default() },
        )
        .await
        .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn partial_update_keeps_other_fields() {
        let pool = test_pool().await;
        let (b, m, c) = seed_refs(&pool).await;
        let product = create(&pool, product_payload("P1", b, m, c)).await.unwrap();

        let updated = update(
            &pool,
            product.id,
            ProductUpdate {
                dealer_price: Some(110.0),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.dealer_price, 110.0);
        assert_eq!(updated.end_user_price, 120.0);
        assert_eq!(updated.name, "P1");
    }
}
