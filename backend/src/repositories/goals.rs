//! Goals repository for database operations

use anyhow::Result;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Goal record from database.
///
/// Only the stored facts live here; progress and status are projections
/// computed by the service on every read.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct GoalRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub start_weight_kg: Decimal,
    pub target_weight_kg: Decimal,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoal {
    pub user_id: Uuid,
    pub title: String,
    pub start_weight_kg: f64,
    pub target_weight_kg: f64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
}

/// Goal repository
pub struct GoalRepository;

impl GoalRepository {
    /// Create a new goal
    pub async fn create(pool: &PgPool, input: CreateGoal) -> Result<GoalRecord> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            INSERT INTO goals (user_id, title, start_weight_kg, target_weight_kg, start_at, end_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, user_id, title, start_weight_kg, target_weight_kg,
                      start_at, end_at, created_at
            "#,
        )
        .bind(input.user_id)
        .bind(&input.title)
        .bind(input.start_weight_kg)
        .bind(input.target_weight_kg)
        .bind(input.start_at)
        .bind(input.end_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get a goal by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid, user_id: Uuid) -> Result<Option<GoalRecord>> {
        let record = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, start_weight_kg, target_weight_kg,
                   start_at, end_at, created_at
            FROM goals
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get all goals for a user, newest first
    pub async fn get_by_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<GoalRecord>> {
        let records = sqlx::query_as::<_, GoalRecord>(
            r#"
            SELECT id, user_id, title, start_weight_kg, target_weight_kg,
                   start_at, end_at, created_at
            FROM goals
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }
}
