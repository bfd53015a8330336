//! User Repository

use super::{RepoError, RepoResult};
use shared::models::{User, UserCreate, UserRole, UserUpdate};
use sqlx::SqlitePool;

const USER_SELECT: &str =
    "SELECT id, name, email, password_hash, role, is_active, created_at, updated_at FROM user";

/// Hash a password with argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify a password against its argon2 hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{} ORDER BY name", USER_SELECT);
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{} WHERE id = ?", USER_SELECT);
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{} WHERE email = ?", USER_SELECT);
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    let password_hash = hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, name, email, password_hash, role, is_active, created_at, updated_at) VALUES (?1, ?2, ?3, ?4, ?5, 1, ?6, ?6)",
    )
    .bind(id)
    .bind(&data.name)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(data.role)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    let password_hash = match &data.password {
        Some(password) => Some(
            hash_password(password)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
        ),
        None => None,
    };

    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE user SET name = COALESCE(?1, name), email = COALESCE(?2, email), password_hash = COALESCE(?3, password_hash), role = COALESCE(?4, role), is_active = COALESCE(?5, is_active), updated_at = ?6 WHERE id = ?7",
    )
    .bind(&data.name)
    .bind(&data.email)
    .bind(&password_hash)
    .bind(data.role)
    .bind(data.is_active)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

/// Number of active admin accounts
pub async fn active_admin_count(pool: &SqlitePool) -> RepoResult<i64> {
    let count: (i64,) =
        sqlx::query_as("SELECT COUNT(*) FROM user WHERE role = 'admin' AND is_active = 1")
            .fetch_one(pool)
            .await?;
    Ok(count.0)
}

/// Create the default admin account if the user table is empty
pub async fn bootstrap_admin(pool: &SqlitePool, email: &str, password: &str) -> RepoResult<()> {
    let count: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM user")
        .fetch_one(pool)
        .await?;
    if count.0 > 0 {
        return Ok(());
    }

    let admin = create(
        pool,
        UserCreate {
            name: "Admin".to_string(),
            email: email.to_string(),
            password: password.to_string(),
            role: UserRole::Admin,
        },
    )
    .await?;
    tracing::info!(email = %admin.email, "Bootstrapped default admin account");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;

    #[tokio::test]
    async fn password_hash_roundtrip() {
        let hash = hash_password("s3cret").unwrap();
        assert!(verify_password("s3cret", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[tokio::test]
    async fn create_hashes_password() {
        let pool = test_pool().await;
        let user = create(
            &pool,
            UserCreate {
                name: "Jo".into(),
                email: "jo@example.com".into(),
                password: "password1".into(),
                role: UserRole::Staff,
            },
        )
        .await
        .unwrap();
        assert_ne!(user.password_hash, "password1");
        assert!(verify_password("password1", &user.password_hash).unwrap());
    }

    #[tokio::test]
    async fn bootstrap_is_idempotent() {
        let pool = test_pool().await;
        bootstrap_admin(&pool, "admin@example.com", "admin123").await.unwrap();
        bootstrap_admin(&pool, "admin@example.com", "admin123").await.unwrap();
        assert_eq!(active_admin_count(&pool).await.unwrap(), 1);

        let admin = find_by_email(&pool, "admin@example.com").await.unwrap().unwrap();
        assert!(admin.role.is_admin());
    }
}
