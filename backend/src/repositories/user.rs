//! User repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

/// User record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserRecord {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// User repository for database operations
pub struct UserRepository;

impl UserRepository {
    /// Create a new user
    pub async fn create(
        pool: &PgPool,
        email: &str,
        password_hash: &str,
        nickname: &str,
    ) -> Result<UserRecord> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            INSERT INTO users (email, password_hash, nickname)
            VALUES ($1, $2, $3)
            RETURNING id, email, password_hash, nickname, created_at, updated_at
            "#,
        )
        .bind(email)
        .bind(password_hash)
        .bind(nickname)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a user by email
    pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, nickname, created_at, updated_at
            FROM users
            WHERE email = $1
            "#,
        )
        .bind(email)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Find a user by ID
    pub async fn find_by_id(pool: &PgPool, id: Uuid) -> Result<Option<UserRecord>> {
        let record = sqlx::query_as::<_, UserRecord>(
            r#"
            SELECT id, email, password_hash, nickname, created_at, updated_at
            FROM users
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Check whether an email is already registered
    pub async fn email_exists(pool: &PgPool, email: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)"#)
                .bind(email)
                .fetch_one(pool)
                .await?;

        Ok(exists.0)
    }

    /// Check whether a nickname is already taken
    pub async fn nickname_exists(pool: &PgPool, nickname: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM users WHERE nickname = $1)"#)
                .bind(nickname)
                .fetch_one(pool)
                .await?;

        Ok(exists.0)
    }
}
