//! Goals API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::goals::{CreateGoalInput, Goal, GoalService};
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use weighin_shared::types::{CreateGoalRequest, GoalResponse, GoalsListResponse};

/// Create goals routes
pub fn goals_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_goal).get(list_goals))
        .route("/:id", get(get_goal))
}

fn to_response(goal: Goal) -> GoalResponse {
    GoalResponse {
        id: goal.id.to_string(),
        title: goal.title,
        start_weight: goal.start_weight_kg,
        target_weight: goal.target_weight_kg,
        start_at: goal.start_at,
        end_at: goal.end_at,
        current_weight: goal.current_weight,
        progress_percent: goal.evaluation.progress_percent,
        status: goal.evaluation.status,
    }
}

/// POST /api/v1/goals - Create a new goal
///
/// The starting weight is snapshotted at creation and never recomputed.
async fn create_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateGoalRequest>,
) -> Result<Json<GoalResponse>, ApiError> {
    let input = CreateGoalInput {
        title: req.title,
        target_weight_kg: req.target_weight,
        duration_hours: req.duration_hours,
        start_weight_kg: req.start_weight,
    };

    let goal = GoalService::create_goal(state.db(), auth.user_id, input).await?;
    Ok(Json(to_response(goal)))
}

/// GET /api/v1/goals - List goals with their computed status
async fn list_goals(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<GoalsListResponse>, ApiError> {
    let goals = GoalService::list_goals(state.db(), auth.user_id).await?;

    Ok(Json(GoalsListResponse {
        goals: goals.into_iter().map(to_response).collect(),
    }))
}

/// GET /api/v1/goals/:id - Get a specific goal
async fn get_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<GoalResponse>, ApiError> {
    let goal_id = uuid::Uuid::parse_str(&id)
        .map_err(|_| ApiError::Validation("Invalid goal ID".to_string()))?;

    let goal = GoalService::get_goal(state.db(), auth.user_id, goal_id).await?;
    Ok(Json(to_response(goal)))
}
