//! Goals service
//!
//! A goal stores only facts: the snapshot taken at creation, the target,
//! and the window. Progress and status are projected from those facts and
//! the latest weight entry on every read, never written back.

use crate::error::ApiError;
use crate::repositories::{goals::GoalRecord, CreateGoal, GoalRepository, WeightRepository};
use crate::services::weight::decimal_to_f64;
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use weighin_shared::progress::{evaluate_goal, GoalEvaluation};
use weighin_shared::validation;

/// Goal with its computed projection
#[derive(Debug, Clone)]
pub struct Goal {
    pub id: Uuid,
    pub title: String,
    pub start_weight_kg: f64,
    pub target_weight_kg: f64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    pub current_weight: Option<f64>,
    pub evaluation: GoalEvaluation,
}

/// Input for creating a goal
#[derive(Debug, Clone)]
pub struct CreateGoalInput {
    pub title: String,
    pub target_weight_kg: f64,
    pub duration_hours: i64,
    pub start_weight_kg: Option<f64>,
}

/// Goals service for business logic
pub struct GoalService;

impl GoalService {
    /// Create a new goal.
    ///
    /// The starting weight is snapshotted now and never recomputed: the
    /// request value if given, otherwise the latest recorded entry.
    pub async fn create_goal(
        pool: &PgPool,
        user_id: Uuid,
        input: CreateGoalInput,
    ) -> Result<Goal, ApiError> {
        validation::validate_goal_title(&input.title).map_err(ApiError::Validation)?;
        validation::validate_duration_hours(input.duration_hours).map_err(ApiError::Validation)?;
        validation::validate_weight(input.target_weight_kg).map_err(ApiError::Validation)?;

        let latest = WeightRepository::get_latest(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let start_weight_kg = match input.start_weight_kg {
            Some(w) => {
                validation::validate_weight(w).map_err(ApiError::Validation)?;
                w
            }
            None => match &latest {
                Some(entry) => decimal_to_f64(&entry.weight_kg),
                None => {
                    return Err(ApiError::Validation(
                        "No recorded weight to start from; log a weight or provide start_weight"
                            .to_string(),
                    ))
                }
            },
        };

        let start_at = Utc::now();
        let end_at = start_at + Duration::hours(input.duration_hours);

        let record = GoalRepository::create(
            pool,
            CreateGoal {
                user_id,
                title: input.title,
                start_weight_kg,
                target_weight_kg: input.target_weight_kg,
                start_at,
                end_at,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        let current_weight = latest.map(|e| decimal_to_f64(&e.weight_kg));
        Ok(Self::project(record, current_weight, start_at))
    }

    /// All goals for a user, each with its projection as of now
    pub async fn list_goals(pool: &PgPool, user_id: Uuid) -> Result<Vec<Goal>, ApiError> {
        let records = GoalRepository::get_by_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let current_weight = Self::current_weight(pool, user_id).await?;
        let now = Utc::now();

        Ok(records
            .into_iter()
            .map(|r| Self::project(r, current_weight, now))
            .collect())
    }

    /// One goal with its projection as of now
    pub async fn get_goal(pool: &PgPool, user_id: Uuid, goal_id: Uuid) -> Result<Goal, ApiError> {
        let record = GoalRepository::get_by_id(pool, goal_id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Goal not found".to_string()))?;

        let current_weight = Self::current_weight(pool, user_id).await?;
        Ok(Self::project(record, current_weight, Utc::now()))
    }

    async fn current_weight(pool: &PgPool, user_id: Uuid) -> Result<Option<f64>, ApiError> {
        let latest = WeightRepository::get_latest(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(latest.map(|e| decimal_to_f64(&e.weight_kg)))
    }

    /// Project stored facts into the view the client sees
    fn project(record: GoalRecord, current_weight: Option<f64>, now: DateTime<Utc>) -> Goal {
        let start = decimal_to_f64(&record.start_weight_kg);
        let target = decimal_to_f64(&record.target_weight_kg);
        let evaluation = evaluate_goal(start, target, current_weight, now, record.end_at);

        Goal {
            id: record.id,
            title: record.title,
            start_weight_kg: start,
            target_weight_kg: target,
            start_at: record.start_at,
            end_at: record.end_at,
            current_weight,
            evaluation,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;
    use weighin_shared::models::GoalStatus;

    fn record(start: f64, target: f64, end_offset_hours: i64) -> GoalRecord {
        let now = Utc::now();
        GoalRecord {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            title: "cut for spring".to_string(),
            start_weight_kg: Decimal::try_from(start).unwrap(),
            target_weight_kg: Decimal::try_from(target).unwrap(),
            start_at: now - Duration::hours(24),
            end_at: now + Duration::hours(end_offset_hours),
            created_at: now - Duration::hours(24),
        }
    }

    #[test]
    fn test_projection_uses_latest_weight() {
        let goal = GoalService::project(record(70.0, 65.0, 24), Some(67.5), Utc::now());
        assert!((goal.evaluation.progress_percent - 50.0).abs() < 1e-10);
        assert_eq!(goal.evaluation.status, GoalStatus::Active);
    }

    #[test]
    fn test_projection_without_entries_is_active_zero() {
        let goal = GoalService::project(record(70.0, 65.0, 24), None, Utc::now());
        assert_eq!(goal.evaluation.progress_percent, 0.0);
        assert_eq!(goal.evaluation.status, GoalStatus::Active);
    }

    #[test]
    fn test_expired_goal_settles_by_tolerance() {
        let now = Utc::now();
        let hit = GoalService::project(record(70.0, 65.0, -1), Some(65.3), now);
        assert_eq!(hit.evaluation.status, GoalStatus::Completed);

        let missed = GoalService::project(record(70.0, 65.0, -1), Some(66.0), now);
        assert_eq!(missed.evaluation.status, GoalStatus::Failed);
    }
}
