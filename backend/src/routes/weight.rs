//! Weight tracking API routes

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::weight::{WeightEntry, WeightService};
use crate::services::ExportService;
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    http::header,
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use weighin_shared::types::{
    LogWeightRequest, WeeklyBucketResponse, WeeklySummaryResponse, WeightEntryResponse,
    WeightHistoryQuery, WeightHistoryResponse,
};

/// Create weight routes
pub fn weight_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(log_weight).get(get_weight_history))
        .route("/weekly", get(get_weekly_summary))
        .route("/export", get(export_weight_csv))
}

fn to_entry_response(entry: WeightEntry) -> WeightEntryResponse {
    WeightEntryResponse {
        id: entry.id.to_string(),
        date: entry.date,
        weight_kg: entry.weight_kg,
        change: entry.change,
    }
}

/// POST /api/v1/weight - Record a weight for a calendar date
///
/// At most one entry exists per date; a second submission for the same
/// date overwrites the stored weight.
async fn log_weight(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<LogWeightRequest>,
) -> Result<Json<WeightEntryResponse>, ApiError> {
    let entry = WeightService::log_weight(state.db(), auth.user_id, req.date, req.weight).await?;
    Ok(Json(to_entry_response(entry)))
}

/// GET /api/v1/weight - Weight history with aggregates
///
/// Entries come back in ascending date order, each carrying the delta
/// against its predecessor.
async fn get_weight_history(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<WeightHistoryQuery>,
) -> Result<Json<WeightHistoryResponse>, ApiError> {
    let history =
        WeightService::get_history(state.db(), auth.user_id, query.start, query.end).await?;

    Ok(Json(WeightHistoryResponse {
        entries: history.entries.into_iter().map(to_entry_response).collect(),
        current_weight: history.current_weight,
        total_change: history.total_change,
        days_recorded: history.days_recorded,
    }))
}

/// GET /api/v1/weight/weekly - Weekly aggregation of the full history
async fn get_weekly_summary(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<WeeklySummaryResponse>, ApiError> {
    let buckets = WeightService::weekly_summary(state.db(), auth.user_id).await?;

    Ok(Json(WeeklySummaryResponse {
        weeks: buckets
            .into_iter()
            .map(|b| WeeklyBucketResponse {
                week_start: b.week_start,
                average_weight: b.average_weight,
                change_from_previous_week: b.change_from_previous_week,
                entries_count: b.entries_count,
            })
            .collect(),
    }))
}

/// GET /api/v1/weight/export - Full weight series as CSV
async fn export_weight_csv(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let csv = ExportService::weight_csv(state.db(), auth.user_id).await?;

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"weight_history.csv\"",
            ),
        ],
        csv,
    ))
}
