//! Order Repository
//!
//! Order + items are written in one transaction; amounts are stored as
//! computed by the pricing calculator and never recomputed afterwards.

use super::{RepoError, RepoResult};
use shared::models::{OrderItemWithProduct, OrderStatus, OrderWithDetails};
use sqlx::SqlitePool;

const ORDER_WITH_DETAILS_SELECT: &str = "SELECT o.id, o.order_number, o.customer_id, c.name as customer_name, o.user_id, u.name as user_name, o.status, o.total_amount, o.gst_amount, o.net_amount, o.notes, o.created_at, o.updated_at FROM orders o JOIN customer c ON o.customer_id = c.id JOIN user u ON o.user_id = u.id";

const ITEM_WITH_PRODUCT_SELECT: &str = "SELECT i.id, i.order_id, i.product_id, p.name as product_name, p.part_code, i.quantity, i.unit_price, i.total_price FROM order_item i JOIN product p ON i.product_id = p.id";

/// Prepared order insert (output of the pricing calculator + request metadata)
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_id: i64,
    pub user_id: i64,
    pub notes: Option<String>,
    pub total_amount: f64,
    pub gst_amount: f64,
    pub net_amount: f64,
    pub items: Vec<NewOrderItem>,
}

/// One priced line of a new order
#[derive(Debug, Clone)]
pub struct NewOrderItem {
    pub product_id: i64,
    pub quantity: i64,
    pub unit_price: f64,
    pub total_price: f64,
}

/// Optional filters for order listing
#[derive(Debug, Clone, Default)]
pub struct OrderFilter {
    pub customer_id: Option<i64>,
    pub status: Option<OrderStatus>,
    pub limit: Option<i64>,
}

/// Generate a human-facing order number: `ORD-YYMMDD-nnn`
fn generate_order_number() -> String {
    use rand::Rng;
    let date = chrono::Utc::now().format("%y%m%d");
    let suffix: u32 = rand::thread_rng().gen_range(0..1000);
    format!("ORD-{date}-{suffix:03}")
}

async fn attach_items(pool: &SqlitePool, orders: &mut [OrderWithDetails]) -> RepoResult<()> {
    for order in orders.iter_mut() {
        let sql = format!("{} WHERE i.order_id = ? ORDER BY i.id", ITEM_WITH_PRODUCT_SELECT);
        order.items = sqlx::query_as::<_, OrderItemWithProduct>(&sql)
            .bind(order.id)
            .fetch_all(pool)
            .await?;
    }
    Ok(())
}

pub async fn find_filtered(
    pool: &SqlitePool,
    filter: &OrderFilter,
) -> RepoResult<Vec<OrderWithDetails>> {
    let mut sql = String::from(ORDER_WITH_DETAILS_SELECT);
    let mut clauses = Vec::new();
    if filter.customer_id.is_some() {
        clauses.push("o.customer_id = ?");
    }
    if filter.status.is_some() {
        clauses.push("o.status = ?");
    }
    if !clauses.is_empty() {
        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }
    sql.push_str(" ORDER BY o.created_at DESC");
    if filter.limit.is_some() {
        sql.push_str(" LIMIT ?");
    }

    let mut query = sqlx::query_as::<_, OrderWithDetails>(&sql);
    if let Some(id) = filter.customer_id {
        query = query.bind(id);
    }
    if let Some(status) = filter.status {
        query = query.bind(status);
    }
    if let Some(limit) = filter.limit {
        query = query.bind(limit);
    }

    let mut orders = query.fetch_all(pool).await?;
    attach_items(pool, &mut orders).await?;
    Ok(orders)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<OrderWithDetails>> {
    let sql = format!("{} WHERE o.id = ?", ORDER_WITH_DETAILS_SELECT);
    let order = sqlx::query_as::<_, OrderWithDetails>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    match order {
        Some(order) => {
            let mut orders = vec![order];
            attach_items(pool, &mut orders).await?;
            Ok(orders.pop())
        }
        None => Ok(None),
    }
}

/// Create the order and its items in one transaction
pub async fn create(pool: &SqlitePool, data: NewOrder) -> RepoResult<OrderWithDetails> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();

    let mut tx = pool.begin().await?;

    // Retry order number generation on the rare random collision
    let mut order_number = generate_order_number();
    for _ in 0..5 {
        let exists: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM orders WHERE order_number = ?")
            .bind(&order_number)
            .fetch_one(&mut *tx)
            .await?;
        if exists.0 == 0 {
            break;
        }
        order_number = generate_order_number();
    }

    sqlx::query(
        "INSERT INTO orders (id, order_number, customer_id, user_id, status, total_amount, gst_amount, net_amount, notes, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
    )
    .bind(id)
    .bind(&order_number)
    .bind(data.customer_id)
    .bind(data.user_id)
    .bind(OrderStatus::Pending)
    .bind(data.total_amount)
    .bind(data.gst_amount)
    .bind(data.net_amount)
    .bind(&data.notes)
    .bind(now)
    .execute(&mut *tx)
    .await?;

    for item in &data.items {
        sqlx::query(
            "INSERT INTO order_item (id, order_id, product_id, quantity, unit_price, total_price) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        )
        .bind(shared::util::snowflake_id())
        .bind(id)
        .bind(item.product_id)
        .bind(item.quantity)
        .bind(item.unit_price)
        .bind(item.total_price)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create order".into()))
}

/// Status-only update
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: OrderStatus,
) -> RepoResult<OrderWithDetails> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE orders SET status = ?1, updated_at = ?2 WHERE id = ?3")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Order {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Order {id} not found")))
}

/// Delete an order; items cascade
pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM orders WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::{brand, category, customer, model, product, user};
    use crate::db::test_support::test_pool;
    use shared::models::{
        BrandCreate, CategoryCreate, CustomerCreate, CustomerType, ModelCreate, ProductCreate,
        UserCreate, UserRole,
    };

    async fn seed(pool: &SqlitePool) -> (i64, i64, i64) {
        let b = brand::create(pool, BrandCreate { name: "B".into(), logo_url: None })
            .await
            .unwrap();
        let m = model::create(pool, ModelCreate { name: "M".into(), brand_id: b.id })
            .await
            .unwrap();
        let c = category::create(pool, CategoryCreate { name: "C".into() }).await.unwrap();
        let p = product::create(
            pool,
            ProductCreate {
                name: "P".into(),
                part_code: None,
                brand_id: b.id,
                model_id: m.id,
                category_id: c.id,
                purchase_price: 80.0,
                dealer_price: 100.0,
                end_user_price: 120.0,
                gst: None,
                photo_url: None,
            },
        )
        .await
        .unwrap();
        let cust = customer::create(
            pool,
            CustomerCreate {
                name: "Acme".into(),
                email: None,
                phone: None,
                address: None,
                customer_type: CustomerType::Dealer,
            },
        )
        .await
        .unwrap();
        let u = user::create(
            pool,
            UserCreate {
                name: "Op".into(),
                email: "op@example.com".into(),
                password: "password1".into(),
                role: UserRole::Staff,
            },
        )
        .await
        .unwrap();
        (p.id, cust.id, u.id)
    }

    fn new_order(product_id: i64, customer_id: i64, user_id: i64) -> NewOrder {
        NewOrder {
            customer_id,
            user_id,
            notes: None,
            total_amount: 200.0,
            gst_amount: 36.0,
            net_amount: 236.0,
            items: vec![NewOrderItem {
                product_id,
                quantity: 2,
                unit_price: 100.0,
                total_price: 200.0,
            }],
        }
    }

    #[tokio::test]
    async fn create_persists_order_and_items() {
        let pool = test_pool().await;
        let (p, c, u) = seed(&pool).await;

        let order = create(&pool, new_order(p, c, u)).await.unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.order_number.starts_with("ORD-"));
        assert_eq!(order.customer_name, "Acme");
        assert_eq!(order.items.len(), 1);
        assert_eq!(order.items[0].product_name, "P");
        assert_eq!(order.net_amount, 236.0);
    }

    #[tokio::test]
    async fn status_update_and_filter() {
        let pool = test_pool().await;
        let (p, c, u) = seed(&pool).await;
        let order = create(&pool, new_order(p, c, u)).await.unwrap();

        let updated = update_status(&pool, order.id, OrderStatus::Shipped).await.unwrap();
        assert_eq!(updated.status, OrderStatus::Shipped);

        let shipped = find_filtered(
            &pool,
            &OrderFilter { status: Some(OrderStatus::Shipped), ..Default::default() },
        )
        .await
        .unwrap();
        assert_eq!(shipped.len(), 1);

        let pending = find_filtered(
            &pool,
            &OrderFilter { status: Some(OrderStatus::Pending), ..Default::default() },
        )
        .await
        .unwrap();
        assert!(pending.is_empty());
    }

    #[tokio::test]
    async fn delete_cascades_items() {
        let pool = test_pool().await;
        let (p, c, u) = seed(&pool).await;
        let order = create(&pool, new_order(p, c, u)).await.unwrap();

        assert!(delete(&pool, order.id).await.unwrap());
        let remaining: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM order_item")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(remaining.0, 0);
    }
}
