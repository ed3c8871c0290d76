//! Battle room service
//!
//! Room lifecycle (WAITING -> IN_PROGRESS -> ENDED, CANCELLED from
//! WAITING), membership, per-participant goals and the progress
//! comparison. Opponent progress is always derived from the stored
//! participant list and each member's own weight entries; there is no
//! synthesized opponent trajectory.

use crate::auth::PasswordService;
use crate::error::ApiError;
use crate::repositories::{
    battle::{ParticipantRecord, RoomRecord},
    BattleRepository, CreateRoom, JoinOutcome, UserRepository, WeightRepository,
};
use crate::services::invite::InviteService;
use crate::services::weight::{days_between, decimal_to_f64};
use chrono::{DateTime, Duration, NaiveDate, Utc};
use rand_core::{OsRng, RngCore};
use sqlx::PgPool;
use uuid::Uuid;
use weighin_shared::errors::JoinRejection;
use weighin_shared::models::{check_start, BattleGoalType, RoomStatus, Standing};
use weighin_shared::progress::{elapsed_fraction, progress_percent, standing};
use weighin_shared::validation;

const ENTRY_CODE_LEN: usize = 6;
// No 0/O, 1/I/L: entry codes get read aloud and typed from screenshots
const ENTRY_CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";
const ENTRY_CODE_ATTEMPTS: usize = 8;

/// Battle room as seen by members
#[derive(Debug, Clone)]
pub struct Room {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub entry_code: String,
    pub status: RoomStatus,
    pub host_nickname: String,
    pub current_participants: usize,
    pub max_participants: i32,
    pub duration_days: i32,
    pub started_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// One participant with their goal state
#[derive(Debug, Clone)]
pub struct Participant {
    pub nickname: String,
    pub is_host: bool,
    pub goal_type: Option<BattleGoalType>,
    pub target_weight_kg: Option<f64>,
    pub starting_weight_kg: Option<f64>,
    pub ready: bool,
}

/// Room detail with membership and day counts
#[derive(Debug, Clone)]
pub struct RoomDetail {
    pub room: Room,
    pub participants: Vec<Participant>,
    pub days_elapsed: Option<i64>,
    pub days_remaining: Option<i64>,
}

/// Input for creating a room
#[derive(Debug, Clone)]
pub struct CreateRoomInput {
    pub name: String,
    pub description: Option<String>,
    pub password: String,
    pub max_participants: i32,
    pub duration_days: i32,
}

/// Input for joining a room: the password or an unexpired invite token
#[derive(Debug, Clone)]
pub struct JoinRoomInput {
    pub entry_code: String,
    pub password: Option<String>,
    pub invite_token: Option<String>,
}

/// Input for setting a personal battle goal
#[derive(Debug, Clone)]
pub struct SetGoalInput {
    pub goal_type: BattleGoalType,
    pub target_weight_kg: Option<f64>,
}

/// The acting user's own progress
#[derive(Debug, Clone)]
pub struct OwnProgress {
    pub nickname: String,
    pub progress_percent: f64,
    pub current_weight: Option<f64>,
}

/// An opponent's progress and the caller's standing against them
#[derive(Debug, Clone)]
pub struct OpponentProgress {
    pub nickname: String,
    pub progress_percent: f64,
    pub standing: Standing,
}

/// Progress comparison for an in-progress or ended battle
#[derive(Debug, Clone)]
pub struct BattleProgress {
    pub room_id: Uuid,
    pub status: RoomStatus,
    pub elapsed_fraction: f64,
    pub me: OwnProgress,
    pub opponents: Vec<OpponentProgress>,
}

/// Battle room service
pub struct BattleService;

impl BattleService {
    /// Create a room; the creator becomes host and first participant.
    ///
    /// The room password is hashed before storage and never appears in
    /// any response or invite.
    pub async fn create_room(
        pool: &PgPool,
        user_id: Uuid,
        input: CreateRoomInput,
    ) -> Result<Room, ApiError> {
        validation::validate_room_name(&input.name).map_err(ApiError::Validation)?;
        if let Some(ref description) = input.description {
            validation::validate_room_description(description).map_err(ApiError::Validation)?;
        }
        validation::validate_room_password(&input.password).map_err(ApiError::Validation)?;
        validation::validate_max_participants(input.max_participants)
            .map_err(ApiError::Validation)?;
        validation::validate_duration_days(input.duration_days).map_err(ApiError::Validation)?;

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        let password_hash = PasswordService::hash_async(input.password)
            .await
            .map_err(ApiError::Internal)?;

        let entry_code = Self::unique_entry_code(pool).await?;

        let record = BattleRepository::create_room(
            pool,
            CreateRoom {
                name: input.name,
                description: input.description,
                password_hash,
                entry_code,
                host_user_id: user_id,
                max_participants: input.max_participants,
                duration_days: input.duration_days,
            },
        )
        .await
        .map_err(ApiError::Internal)?;

        match BattleRepository::add_participant(pool, record.id, user_id, &user.nickname)
            .await
            .map_err(ApiError::Internal)?
        {
            JoinOutcome::Joined(_) => {}
            _ => {
                return Err(ApiError::Internal(anyhow::anyhow!(
                    "host could not join freshly created room"
                )))
            }
        }

        let participants = BattleRepository::participants(pool, record.id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(Self::to_room(&record, &participants, Utc::now().date_naive())?)
    }

    /// Join a room by entry code, authenticating with the room password or
    /// an unexpired invite token.
    pub async fn join_room(
        pool: &PgPool,
        user_id: Uuid,
        input: JoinRoomInput,
    ) -> Result<Room, ApiError> {
        let room = BattleRepository::find_by_entry_code(pool, &input.entry_code)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))?;

        if Self::parse_status(&room)? != RoomStatus::Waiting {
            return Err(JoinRejection::NotJoinable.into());
        }

        // Invite tokens grant entry without the password; share text never
        // has to carry the secret
        if let Some(ref token) = input.invite_token {
            let invite = BattleRepository::find_invite_by_token(pool, token)
                .await
                .map_err(ApiError::Internal)?
                .ok_or(JoinRejection::InvalidInvite)?;
            if !InviteService::token_is_valid(&invite, room.id, Utc::now()) {
                return Err(JoinRejection::InvalidInvite.into());
            }
        } else if let Some(password) = input.password.clone() {
            let valid = PasswordService::verify_async(password, room.password_hash.clone())
                .await
                .map_err(ApiError::Internal)?;
            if !valid {
                return Err(JoinRejection::WrongPassword.into());
            }
        } else {
            return Err(ApiError::Validation(
                "Provide the room password or an invite token".to_string(),
            ));
        }

        let user = UserRepository::find_by_id(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Unauthorized("User not found".to_string()))?;

        match BattleRepository::add_participant(pool, room.id, user_id, &user.nickname)
            .await
            .map_err(ApiError::Internal)?
        {
            JoinOutcome::Joined(_) => {}
            JoinOutcome::RoomFull => return Err(JoinRejection::RoomFull.into()),
            JoinOutcome::AlreadyMember => return Err(JoinRejection::AlreadyMember.into()),
            JoinOutcome::NotWaiting => return Err(JoinRejection::NotJoinable.into()),
        }

        let participants = BattleRepository::participants(pool, room.id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(Self::to_room(&room, &participants, Utc::now().date_naive())?)
    }

    /// Rooms the user belongs to
    pub async fn list_rooms(pool: &PgPool, user_id: Uuid) -> Result<Vec<Room>, ApiError> {
        let records = BattleRepository::list_for_user(pool, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let today = Utc::now().date_naive();
        let mut rooms = Vec::with_capacity(records.len());
        for record in &records {
            let participants = BattleRepository::participants(pool, record.id)
                .await
                .map_err(ApiError::Internal)?;
            rooms.push(Self::to_room(record, &participants, today)?);
        }
        Ok(rooms)
    }

    /// Room detail; members only
    pub async fn room_detail(
        pool: &PgPool,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<RoomDetail, ApiError> {
        let record = Self::load_room(pool, room_id).await?;
        let participants = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;
        Self::require_member(&participants, user_id)?;

        let today = Utc::now().date_naive();
        let room = Self::to_room(&record, &participants, today)?;

        let days_elapsed = record.started_on.map(|s| days_between(s, today));
        let days_remaining = record.ends_on.map(|e| days_between(today, e));

        let participants = participants
            .iter()
            .map(|p| Self::to_participant(p, record.host_user_id))
            .collect::<Result<Vec<_>, ApiError>>()?;

        Ok(RoomDetail {
            room,
            participants,
            days_elapsed,
            days_remaining,
        })
    }

    /// Set or replace the caller's personal goal while the room waits.
    ///
    /// The starting weight snapshots the caller's latest entry; without a
    /// recorded weight there is nothing to measure progress against.
    pub async fn set_goal(
        pool: &PgPool,
        user_id: Uuid,
        room_id: Uuid,
        input: SetGoalInput,
    ) -> Result<Participant, ApiError> {
        let record = Self::load_room(pool, room_id).await?;
        let participants = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;
        Self::require_member(&participants, user_id)?;

        if Self::parse_status(&record)? != RoomStatus::Waiting {
            return Err(ApiError::Conflict(
                "Goals can only be set while the room is waiting".to_string(),
            ));
        }

        let latest = WeightRepository::get_latest(pool, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| {
                ApiError::Validation("Log a weight before setting a battle goal".to_string())
            })?;
        let starting_weight = decimal_to_f64(&latest.weight_kg);

        let target_weight = if input.goal_type.requires_target() {
            let target = input.target_weight_kg.ok_or_else(|| {
                ApiError::Validation("target_weight is required for this goal type".to_string())
            })?;
            validation::validate_weight(target).map_err(ApiError::Validation)?;
            target
        } else {
            // MAINTAIN: the target is the starting snapshot itself
            starting_weight
        };

        let updated = BattleRepository::set_participant_goal(
            pool,
            room_id,
            user_id,
            input.goal_type.as_str(),
            target_weight,
            starting_weight,
        )
        .await
        .map_err(ApiError::Internal)?
        .ok_or_else(|| ApiError::NotFound("Participant not found".to_string()))?;

        Self::to_participant(&updated, record.host_user_id)
    }

    /// Start the battle. Host only; the room must have at least two
    /// participants and every participant must have set a goal. Each guard
    /// failure is reported with its own reason.
    pub async fn start_battle(pool: &PgPool, user_id: Uuid, room_id: Uuid) -> Result<Room, ApiError> {
        let record = Self::load_room(pool, room_id).await?;

        if record.host_user_id != user_id {
            return Err(ApiError::Forbidden(
                "Only the host can start the battle".to_string(),
            ));
        }
        if Self::parse_status(&record)? != RoomStatus::Waiting {
            return Err(ApiError::Conflict("Room is not waiting".to_string()));
        }

        let participants = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;

        let missing: Vec<String> = participants
            .iter()
            .filter(|p| !p.is_ready())
            .map(|p| p.nickname.clone())
            .collect();
        check_start(participants.len(), &missing)?;

        let today = Utc::now().date_naive();
        let ends_on = today + Duration::days(record.duration_days as i64);

        let started = BattleRepository::start_room(pool, room_id, today, ends_on)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Conflict("Room is not waiting".to_string()))?;

        Ok(Self::to_room(&started, &participants, today)?)
    }

    /// Leave a WAITING room. The last participant out prunes the room;
    /// a departing host hands the room to the earliest remaining joiner.
    pub async fn leave_room(pool: &PgPool, user_id: Uuid, room_id: Uuid) -> Result<(), ApiError> {
        let record = Self::load_room(pool, room_id).await?;
        let participants = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;
        Self::require_member(&participants, user_id)?;

        if Self::parse_status(&record)? != RoomStatus::Waiting {
            return Err(ApiError::Conflict(
                "Cannot leave once the battle has started".to_string(),
            ));
        }

        BattleRepository::remove_participant(pool, room_id, user_id)
            .await
            .map_err(ApiError::Internal)?;

        let remaining = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;

        if remaining.is_empty() {
            BattleRepository::delete_room(pool, room_id)
                .await
                .map_err(ApiError::Internal)?;
        } else if record.host_user_id == user_id {
            BattleRepository::transfer_host(pool, room_id, remaining[0].user_id)
                .await
                .map_err(ApiError::Internal)?;
        }

        Ok(())
    }

    /// Cancel a WAITING room. Host only.
    pub async fn cancel_room(pool: &PgPool, user_id: Uuid, room_id: Uuid) -> Result<Room, ApiError> {
        let record = Self::load_room(pool, room_id).await?;

        if record.host_user_id != user_id {
            return Err(ApiError::Forbidden(
                "Only the host can cancel the room".to_string(),
            ));
        }

        let cancelled = BattleRepository::cancel_room(pool, room_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Conflict("Only a waiting room can be cancelled".to_string()))?;

        let participants = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;
        Ok(Self::to_room(&cancelled, &participants, Utc::now().date_naive())?)
    }

    /// Progress comparison for an in-progress (or ended) battle.
    ///
    /// Every participant's percentage comes from their own recorded
    /// weights mapped onto their personal goal; the caller additionally
    /// gets a standing against each opponent.
    pub async fn progress(
        pool: &PgPool,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<BattleProgress, ApiError> {
        let record = Self::load_room(pool, room_id).await?;
        let participants = BattleRepository::participants(pool, room_id)
            .await
            .map_err(ApiError::Internal)?;
        let me = Self::require_member(&participants, user_id)?;

        let today = Utc::now().date_naive();
        let status = Self::parse_status(&record)?.effective_on(record.ends_on, today);
        if !matches!(status, RoomStatus::InProgress | RoomStatus::Ended) {
            return Err(ApiError::Conflict("Battle has not started".to_string()));
        }

        let fraction = record
            .started_on
            .map(|s| elapsed_fraction(s, today, record.duration_days as i64))
            .unwrap_or(0.0);

        let mut my_progress = None;
        let mut others = Vec::new();
        for p in &participants {
            let current = WeightRepository::get_latest(pool, p.user_id)
                .await
                .map_err(ApiError::Internal)?
                .map(|e| decimal_to_f64(&e.weight_kg));
            let percent = Self::participant_percent(p, current);

            if p.user_id == user_id {
                my_progress = Some(OwnProgress {
                    nickname: me.nickname.clone(),
                    progress_percent: percent,
                    current_weight: current,
                });
            } else {
                others.push((p.nickname.clone(), percent));
            }
        }

        let me = my_progress
            .ok_or_else(|| ApiError::Internal(anyhow::anyhow!("caller missing from participants")))?;

        let opponents = others
            .into_iter()
            .map(|(nickname, percent)| OpponentProgress {
                nickname,
                progress_percent: percent,
                standing: standing(me.progress_percent, percent),
            })
            .collect();

        Ok(BattleProgress {
            room_id,
            status,
            elapsed_fraction: fraction,
            me,
            opponents,
        })
    }

    /// A participant's completion against their own goal
    fn participant_percent(p: &ParticipantRecord, current: Option<f64>) -> f64 {
        match (&p.starting_weight_kg, &p.target_weight_kg) {
            (Some(start), Some(target)) => {
                let start = decimal_to_f64(start);
                let target = decimal_to_f64(target);
                progress_percent(start, target, current.unwrap_or(start))
            }
            _ => 0.0,
        }
    }

    async fn load_room(pool: &PgPool, room_id: Uuid) -> Result<RoomRecord, ApiError> {
        BattleRepository::get_by_id(pool, room_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))
    }

    fn require_member(
        participants: &[ParticipantRecord],
        user_id: Uuid,
    ) -> Result<ParticipantRecord, ApiError> {
        participants
            .iter()
            .find(|p| p.user_id == user_id)
            .cloned()
            .ok_or_else(|| ApiError::Forbidden("Not a member of this room".to_string()))
    }

    fn parse_status(record: &RoomRecord) -> Result<RoomStatus, ApiError> {
        record
            .status
            .parse::<RoomStatus>()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))
    }

    fn to_room(
        record: &RoomRecord,
        participants: &[ParticipantRecord],
        today: NaiveDate,
    ) -> Result<Room, ApiError> {
        let status = Self::parse_status(record)?.effective_on(record.ends_on, today);
        let host_nickname = participants
            .iter()
            .find(|p| p.user_id == record.host_user_id)
            .map(|p| p.nickname.clone())
            .unwrap_or_default();

        Ok(Room {
            id: record.id,
            name: record.name.clone(),
            description: record.description.clone(),
            entry_code: record.entry_code.clone(),
            status,
            host_nickname,
            current_participants: participants.len(),
            max_participants: record.max_participants,
            duration_days: record.duration_days,
            started_on: record.started_on,
            ends_on: record.ends_on,
            created_at: record.created_at,
        })
    }

    fn to_participant(p: &ParticipantRecord, host_user_id: Uuid) -> Result<Participant, ApiError> {
        let goal_type = p
            .goal_type
            .as_deref()
            .map(|s| {
                s.parse::<BattleGoalType>()
                    .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))
            })
            .transpose()?;

        Ok(Participant {
            nickname: p.nickname.clone(),
            is_host: p.user_id == host_user_id,
            goal_type,
            target_weight_kg: p.target_weight_kg.as_ref().map(decimal_to_f64),
            starting_weight_kg: p.starting_weight_kg.as_ref().map(decimal_to_f64),
            ready: p.is_ready(),
        })
    }

    fn generate_entry_code() -> String {
        let mut bytes = [0u8; ENTRY_CODE_LEN];
        OsRng.fill_bytes(&mut bytes);
        bytes
            .iter()
            .map(|b| ENTRY_CODE_ALPHABET[*b as usize % ENTRY_CODE_ALPHABET.len()] as char)
            .collect()
    }

    async fn unique_entry_code(pool: &PgPool) -> Result<String, ApiError> {
        for _ in 0..ENTRY_CODE_ATTEMPTS {
            let code = Self::generate_entry_code();
            if !BattleRepository::entry_code_exists(pool, &code)
                .await
                .map_err(ApiError::Internal)?
            {
                return Ok(code);
            }
        }
        Err(ApiError::Internal(anyhow::anyhow!(
            "could not allocate a unique entry code"
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn participant(start: Option<f64>, target: Option<f64>) -> ParticipantRecord {
        ParticipantRecord {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            nickname: "mina".to_string(),
            goal_type: start.map(|_| "WEIGHT_LOSS".to_string()),
            target_weight_kg: target.map(|t| Decimal::try_from(t).unwrap()),
            starting_weight_kg: start.map(|s| Decimal::try_from(s).unwrap()),
            joined_at: Utc::now(),
        }
    }

    #[test]
    fn test_entry_code_shape() {
        let code = BattleService::generate_entry_code();
        assert_eq!(code.len(), ENTRY_CODE_LEN);
        assert!(code
            .bytes()
            .all(|b| ENTRY_CODE_ALPHABET.contains(&b)));
    }

    #[test]
    fn test_entry_codes_avoid_ambiguous_characters() {
        for _ in 0..50 {
            let code = BattleService::generate_entry_code();
            for forbidden in ['0', 'O', '1', 'I', 'L'] {
                assert!(!code.contains(forbidden), "code {code} contains {forbidden}");
            }
        }
    }

    #[test]
    fn test_participant_percent_maps_weight_onto_goal() {
        let p = participant(Some(70.0), Some(65.0));
        let percent = BattleService::participant_percent(&p, Some(67.5));
        assert!((percent - 50.0).abs() < 1e-10);
    }

    #[test]
    fn test_participant_percent_without_current_weight_is_zero() {
        let p = participant(Some(70.0), Some(65.0));
        assert_eq!(BattleService::participant_percent(&p, None), 0.0);
    }

    #[test]
    fn test_participant_percent_without_goal_is_zero() {
        let p = participant(None, None);
        assert_eq!(BattleService::participant_percent(&p, Some(70.0)), 0.0);
    }

    #[test]
    fn test_readiness_requires_full_goal() {
        assert!(participant(Some(70.0), Some(65.0)).is_ready());
        assert!(!participant(None, None).is_ready());
    }
}
