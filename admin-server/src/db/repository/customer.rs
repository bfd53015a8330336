//! Customer Repository

use super::{RepoError, RepoResult};
use shared::models::{Customer, CustomerCreate, CustomerType, CustomerUpdate};
use sqlx::SqlitePool;

const CUSTOMER_SELECT: &str =
    "SELECT id, name, email, phone, address, customer_type, created_at, updated_at FROM customer";

/// Optional filters for customer listing
#[derive(Debug, Clone, Default)]
pub struct CustomerFilter {
    pub customer_type: Option<CustomerType>,
    /// Case-insensitive substring match on name, email, or phone
    pub search: Option<String>,
}

pub async fn find_filtered(
    pool: &SqlitePool,
    filter: &CustomerFilter,
) -> RepoResult<Vec<Customer>> {
    let mut sql = String::from(CUSTOMER_SELECT);
    let mut clauses = Vec::new();
    if filter.customer_type.is_some() {
        clauses.push("customer_type = ?");
    }
    if filter.search.is_some() {
        clauses.push("(name LIKE ? OR email LIKE ? OR phone LIKE ?)");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY name");

    let mut query = sqlx::query_as::<_, Customer>(&sql);
    if let Some(t) = filter.customer_type {
        query = query.bind(t);
    }
    if let Some(s) = &filter.search {
        let pattern = format!("%{s}%");
        query = query.bind(pattern.clone()).bind(pattern.clone()).bind(pattern);
    }

    let rows = query.fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Customer>> {
    let sql = format!("{} WHERE id = ?", CUSTOMER_SELECT);
    let row = sqlx::query_as::<_, Customer>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: CustomerCreate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO customer (id, name, email, phone, address, customer_type, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?7)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(data.customer_type)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create customer".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: CustomerUpdate) -> RepoResult<Customer> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE customer SET name = COALESCE(?1, name), email = COALESCE(?2, email), phone = COALESCE(?3, phone), address = COALESCE(?4, address), customer_type = COALESCE(?5, customer_type), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&data.phone)
    .bind(&data.address)
    .bind(data.customer_type)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Customer {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Customer {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM customer WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of orders referencing this customer
pub async fn order_count(pool: &SqlitePool, id: i64) -> RepoResult<i64> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE customer_id = ?")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(count.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    fn dealer(name: &str, email: &str) -> CustomerCreate {
        CustomerCreate {
            name: name.into(),
            email: Some(email.into()),
            phone: None,
            address: None,
            customer_type: CustomerType::Dealer,
        }
    }

    #[tokio::test]
    async fn type_filter_and_search() {
        let pool = test_pool().await;
        create(&pool, dealer("Acme Tools", "acme@example.com")).await.unwrap();
        create(
            &pool,
            CustomerCreate {
                name: "Walk-in".into(),
                email: None,
                phone: Some("5550101".into()),
                address: None,
                customer_type: CustomerType::EndUser,
            },
        )
        .await
        .unwrap();

        let dealers = find_filtered(
            &pool,
            &CustomerFilter { customer_type: Some(CustomerType::Dealer), search: None },
        )
        .await
        .unwrap();
        assert_eq!(dealers.len(), 1);
        assert_eq!(dealers[0].name, "Acme Tools");

        let by_phone = find_filtered(
            &pool,
            &CustomerFilter { customer_type: None, search: Some("5550".into()) },
        )
        .await
        .unwrap();
        assert_eq!(by_phone.len(), 1);
        assert_eq!(by_phone[0].name, "Walk-in");
    }

    #[tokio::test]
    async fn duplicate_email_is_rejected() {
        let pool = test_pool().await;
        create(&pool, dealer("A", "same@example.com")).await.unwrap();
        let err = create(&pool, dealer("B", "same@example.com")).await.unwrap_err();
        assert!(matches!(err, RepoError::Duplicate(_)));
    }
}
