//! API request and response types

use crate::models::{BattleGoalType, GoalStatus, RoomStatus, Standing};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// API error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

/// Error detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

/// Authentication tokens response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthTokens {
    pub access_token: String,
    pub refresh_token: String,
    pub token_type: String,
    pub expires_in: i64,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    /// Display name shown in battle rooms
    pub nickname: String,
}

/// User profile response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: String,
    pub email: String,
    pub nickname: String,
    pub created_at: DateTime<Utc>,
}

// ============================================================================
// Weight Tracking Types
// ============================================================================

/// Weight entry request.
///
/// One entry per calendar date: submitting a second weight for the same
/// date replaces the earlier value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogWeightRequest {
    /// Calendar day the weight was taken; defaults to today
    #[serde(default)]
    pub date: Option<NaiveDate>,
    /// Weight in kilograms
    pub weight: f64,
}

/// One recorded weight sample
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightEntryResponse {
    pub id: String,
    pub date: NaiveDate,
    pub weight_kg: f64,
    /// Delta against the chronologically previous entry; absent on the first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<f64>,
}

/// Weight history query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WeightHistoryQuery {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

/// Weight history with the aggregates the dashboard shows
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeightHistoryResponse {
    /// Entries in ascending date order
    pub entries: Vec<WeightEntryResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    /// Latest weight minus the first in range
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_change: Option<f64>,
    pub days_recorded: usize,
}

/// One week's aggregate in the weekly view
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklyBucketResponse {
    /// Monday of the week
    pub week_start: NaiveDate,
    pub average_weight: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change_from_previous_week: Option<f64>,
    pub entries_count: usize,
}

/// Weekly aggregation response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeeklySummaryResponse {
    pub weeks: Vec<WeeklyBucketResponse>,
}

// ============================================================================
// Goal Types
// ============================================================================

/// Create goal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    /// Target weight in kilograms
    pub target_weight: f64,
    /// Goal window in hours (weekly preset = 168, monthly = 720)
    pub duration_hours: i64,
    /// Starting snapshot; defaults to the latest recorded weight
    #[serde(default)]
    pub start_weight: Option<f64>,
}

/// Goal response with its computed projection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalResponse {
    pub id: String,
    pub title: String,
    pub start_weight: f64,
    pub target_weight: f64,
    pub start_at: DateTime<Utc>,
    pub end_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
    pub progress_percent: f64,
    pub status: GoalStatus,
}

/// Goals list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsListResponse {
    pub goals: Vec<GoalResponse>,
}

// ============================================================================
// Battle Room Types
// ============================================================================

/// Create battle room request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateRoomRequest {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Shared secret required to join; stored hashed, never echoed back
    pub password: String,
    pub max_participants: i32,
    pub duration_days: i32,
}

/// Battle room summary.
///
/// The room password never appears here or anywhere else in a response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomResponse {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Public short code used to join, distinct from the password
    pub entry_code: String,
    pub status: RoomStatus,
    pub host_nickname: String,
    pub current_participants: usize,
    pub max_participants: i32,
    pub duration_days: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub started_on: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Battle rooms list response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomListResponse {
    pub rooms: Vec<RoomResponse>,
}

/// One participant as shown in a room detail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParticipantResponse {
    pub nickname: String,
    pub is_host: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_type: Option<BattleGoalType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub target_weight: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub starting_weight: Option<f64>,
    /// True once the participant has set their goal
    pub ready: bool,
}

/// Battle room detail response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomDetailResponse {
    #[serde(flatten)]
    pub room: RoomResponse,
    pub participants: Vec<ParticipantResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_elapsed: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub days_remaining: Option<i64>,
}

/// Join room request: a password or an unexpired invite token
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinRoomRequest {
    pub entry_code: String,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub invite_token: Option<String>,
}

/// Set personal battle goal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetBattleGoalRequest {
    pub goal_type: BattleGoalType,
    /// Required unless goal_type is MAINTAIN
    #[serde(default)]
    pub target_weight: Option<f64>,
}

/// The acting user's own progress within a battle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OwnProgressResponse {
    pub nickname: String,
    pub progress_percent: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_weight: Option<f64>,
}

/// An opponent's progress plus the caller's standing against them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpponentProgressResponse {
    pub nickname: String,
    pub progress_percent: f64,
    pub standing: Standing,
}

/// Battle progress response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BattleProgressResponse {
    pub room_id: String,
    pub status: RoomStatus,
    /// Days elapsed over planned duration, clamped to [0, 1]
    pub elapsed_fraction: f64,
    pub me: OwnProgressResponse,
    pub opponents: Vec<OpponentProgressResponse>,
}

// ============================================================================
// Invitation Types
// ============================================================================

/// Invite response: a shareable link and message.
///
/// The invite token is a capability scoped to one room; the room password
/// deliberately appears in neither field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInviteResponse {
    pub invite_url: String,
    pub share_message: String,
    pub expires_at: DateTime<Utc>,
}
