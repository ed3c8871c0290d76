//! Weight entry repository for database operations

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Weight entry record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct WeightEntryRecord {
    pub id: Uuid,
    pub user_id: Uuid,
    pub recorded_on: NaiveDate,
    pub weight_kg: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Weight entry repository for database operations
pub struct WeightRepository;

impl WeightRepository {
    /// Insert or replace the entry for a calendar date.
    ///
    /// A user has at most one entry per day; a second submission for the
    /// same date overwrites the stored weight instead of appending.
    pub async fn upsert(
        pool: &PgPool,
        user_id: Uuid,
        recorded_on: NaiveDate,
        weight_kg: f64,
    ) -> Result<WeightEntryRecord> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            INSERT INTO weight_entries (user_id, recorded_on, weight_kg)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, recorded_on)
            DO UPDATE SET weight_kg = EXCLUDED.weight_kg, updated_at = NOW()
            RETURNING id, user_id, recorded_on, weight_kg, created_at, updated_at
            "#,
        )
        .bind(user_id)
        .bind(recorded_on)
        .bind(weight_kg)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Get entries for a user within an optional date range, oldest first
    pub async fn get_range(
        pool: &PgPool,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<Vec<WeightEntryRecord>> {
        let records = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            SELECT id, user_id, recorded_on, weight_kg, created_at, updated_at
            FROM weight_entries
            WHERE user_id = $1
              AND ($2::date IS NULL OR recorded_on >= $2)
              AND ($3::date IS NULL OR recorded_on <= $3)
            ORDER BY recorded_on ASC
            "#,
        )
        .bind(user_id)
        .bind(start)
        .bind(end)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Get the most recent entry for a user
    pub async fn get_latest(pool: &PgPool, user_id: Uuid) -> Result<Option<WeightEntryRecord>> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            SELECT id, user_id, recorded_on, weight_kg, created_at, updated_at
            FROM weight_entries
            WHERE user_id = $1
            ORDER BY recorded_on DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get the entry immediately before a date, if any.
    ///
    /// Used to derive the `change` figure for a freshly submitted entry.
    pub async fn get_previous(
        pool: &PgPool,
        user_id: Uuid,
        before: NaiveDate,
    ) -> Result<Option<WeightEntryRecord>> {
        let record = sqlx::query_as::<_, WeightEntryRecord>(
            r#"
            SELECT id, user_id, recorded_on, weight_kg, created_at, updated_at
            FROM weight_entries
            WHERE user_id = $1 AND recorded_on < $2
            ORDER BY recorded_on DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .bind(before)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
