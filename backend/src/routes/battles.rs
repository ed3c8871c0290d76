//! Battle room API routes
//!
//! Room lifecycle, membership, per-participant goals, progress comparison
//! and invite links.

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::services::battle::{
    BattleService, CreateRoomInput, JoinRoomInput, Participant, Room, RoomDetail, SetGoalInput,
};
use crate::services::InviteService;
use crate::state::AppState;
use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};
use weighin_shared::types::{
    BattleProgressResponse, CreateInviteResponse, CreateRoomRequest, JoinRoomRequest,
    OpponentProgressResponse, OwnProgressResponse, ParticipantResponse, RoomDetailResponse,
    RoomListResponse, RoomResponse, SetBattleGoalRequest,
};

/// Create battle routes
pub fn battle_routes() -> Router<AppState> {
    Router::new()
        .route("/", post(create_room).get(list_rooms))
        .route("/join", post(join_room))
        .route("/:id", get(get_room))
        .route("/:id/goal", post(set_goal))
        .route("/:id/start", post(start_battle))
        .route("/:id/leave", post(leave_room))
        .route("/:id/cancel", post(cancel_room))
        .route("/:id/progress", get(get_progress))
        .route("/:id/invite", post(create_invite))
}

fn to_room_response(room: Room) -> RoomResponse {
    RoomResponse {
        id: room.id.to_string(),
        name: room.name,
        description: room.description,
        entry_code: room.entry_code,
        status: room.status,
        host_nickname: room.host_nickname,
        current_participants: room.current_participants,
        max_participants: room.max_participants,
        duration_days: room.duration_days,
        started_on: room.started_on,
        ends_on: room.ends_on,
        created_at: room.created_at,
    }
}

fn to_participant_response(p: Participant) -> ParticipantResponse {
    ParticipantResponse {
        nickname: p.nickname,
        is_host: p.is_host,
        goal_type: p.goal_type,
        target_weight: p.target_weight_kg,
        starting_weight: p.starting_weight_kg,
        ready: p.ready,
    }
}

fn to_detail_response(detail: RoomDetail) -> RoomDetailResponse {
    RoomDetailResponse {
        room: to_room_response(detail.room),
        participants: detail
            .participants
            .into_iter()
            .map(to_participant_response)
            .collect(),
        days_elapsed: detail.days_elapsed,
        days_remaining: detail.days_remaining,
    }
}

fn parse_room_id(id: &str) -> Result<uuid::Uuid, ApiError> {
    uuid::Uuid::parse_str(id).map_err(|_| ApiError::Validation("Invalid room ID".to_string()))
}

/// POST /api/v1/battles - Create a battle room
///
/// The creator becomes host and first participant. The response carries
/// the public entry code but never the password.
async fn create_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<CreateRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let input = CreateRoomInput {
        name: req.name,
        description: req.description,
        password: req.password,
        max_participants: req.max_participants,
        duration_days: req.duration_days,
    };

    let room = BattleService::create_room(state.db(), auth.user_id, input).await?;
    Ok(Json(to_room_response(room)))
}

/// POST /api/v1/battles/join - Join a room by entry code
///
/// Authenticates with the room password or an unexpired invite token.
async fn join_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(req): Json<JoinRoomRequest>,
) -> Result<Json<RoomResponse>, ApiError> {
    let input = JoinRoomInput {
        entry_code: req.entry_code,
        password: req.password,
        invite_token: req.invite_token,
    };

    let room = BattleService::join_room(state.db(), auth.user_id, input).await?;
    Ok(Json(to_room_response(room)))
}

/// GET /api/v1/battles - Rooms the caller belongs to
async fn list_rooms(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<RoomListResponse>, ApiError> {
    let rooms = BattleService::list_rooms(state.db(), auth.user_id).await?;

    Ok(Json(RoomListResponse {
        rooms: rooms.into_iter().map(to_room_response).collect(),
    }))
}

/// GET /api/v1/battles/:id - Room detail with participants
async fn get_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RoomDetailResponse>, ApiError> {
    let room_id = parse_room_id(&id)?;
    let detail = BattleService::room_detail(state.db(), auth.user_id, room_id).await?;
    Ok(Json(to_detail_response(detail)))
}

/// POST /api/v1/battles/:id/goal - Set the caller's personal goal
async fn set_goal(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
    Json(req): Json<SetBattleGoalRequest>,
) -> Result<Json<ParticipantResponse>, ApiError> {
    let room_id = parse_room_id(&id)?;
    let input = SetGoalInput {
        goal_type: req.goal_type,
        target_weight_kg: req.target_weight,
    };

    let participant = BattleService::set_goal(state.db(), auth.user_id, room_id, input).await?;
    Ok(Json(to_participant_response(participant)))
}

/// POST /api/v1/battles/:id/start - Start the battle (host only)
///
/// Rejected with a reason when fewer than two participants have joined or
/// when any participant still lacks a goal.
async fn start_battle(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room_id = parse_room_id(&id)?;
    let room = BattleService::start_battle(state.db(), auth.user_id, room_id).await?;
    Ok(Json(to_room_response(room)))
}

/// POST /api/v1/battles/:id/leave - Leave a waiting room
async fn leave_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let room_id = parse_room_id(&id)?;
    BattleService::leave_room(state.db(), auth.user_id, room_id).await?;
    Ok(Json(serde_json::json!({"left": true})))
}

/// POST /api/v1/battles/:id/cancel - Cancel a waiting room (host only)
async fn cancel_room(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<RoomResponse>, ApiError> {
    let room_id = parse_room_id(&id)?;
    let room = BattleService::cancel_room(state.db(), auth.user_id, room_id).await?;
    Ok(Json(to_room_response(room)))
}

/// GET /api/v1/battles/:id/progress - Progress comparison
async fn get_progress(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<BattleProgressResponse>, ApiError> {
    let room_id = parse_room_id(&id)?;
    let progress = BattleService::progress(state.db(), auth.user_id, room_id).await?;

    Ok(Json(BattleProgressResponse {
        room_id: progress.room_id.to_string(),
        status: progress.status,
        elapsed_fraction: progress.elapsed_fraction,
        me: OwnProgressResponse {
            nickname: progress.me.nickname,
            progress_percent: progress.me.progress_percent,
            current_weight: progress.me.current_weight,
        },
        opponents: progress
            .opponents
            .into_iter()
            .map(|o| OpponentProgressResponse {
                nickname: o.nickname,
                progress_percent: o.progress_percent,
                standing: o.standing,
            })
            .collect(),
    }))
}

/// POST /api/v1/battles/:id/invite - Mint a shareable invite link
async fn create_invite(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<String>,
) -> Result<Json<CreateInviteResponse>, ApiError> {
    let room_id = parse_room_id(&id)?;
    let invite =
        InviteService::create(state.db(), &state.config().invite, auth.user_id, room_id).await?;

    Ok(Json(CreateInviteResponse {
        invite_url: invite.invite_url,
        share_message: invite.share_message,
        expires_at: invite.expires_at,
    }))
}
