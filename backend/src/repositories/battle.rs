//! Battle room repository for database operations
//!
//! Rooms, participants and invites. The join path runs in a transaction
//! with the room row locked so the capacity check and the participant
//! insert cannot interleave across concurrent requests.

use anyhow::Result;
use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

/// Battle room record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RoomRecord {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub password_hash: String,
    pub entry_code: String,
    pub host_user_id: Uuid,
    pub status: String,
    pub max_participants: i32,
    pub duration_days: i32,
    pub started_on: Option<NaiveDate>,
    pub ends_on: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
}

/// Participant record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct ParticipantRecord {
    pub id: Uuid,
    pub room_id: Uuid,
    pub user_id: Uuid,
    pub nickname: String,
    pub goal_type: Option<String>,
    pub target_weight_kg: Option<Decimal>,
    pub starting_weight_kg: Option<Decimal>,
    pub joined_at: DateTime<Utc>,
}

impl ParticipantRecord {
    /// A participant is ready once their goal is fully set
    pub fn is_ready(&self) -> bool {
        self.goal_type.is_some() && self.starting_weight_kg.is_some()
    }
}

/// Room invite record from database
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct InviteRecord {
    pub id: Uuid,
    pub room_id: Uuid,
    pub created_by: Uuid,
    pub token: String,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a battle room
#[derive(Debug, Clone)]
pub struct CreateRoom {
    pub name: String,
    pub description: Option<String>,
    pub password_hash: String,
    pub entry_code: String,
    pub host_user_id: Uuid,
    pub max_participants: i32,
    pub duration_days: i32,
}

/// Outcome of an atomic join attempt
#[derive(Debug)]
pub enum JoinOutcome {
    Joined(ParticipantRecord),
    RoomFull,
    AlreadyMember,
    NotWaiting,
}

const ROOM_COLUMNS: &str = "id, name, description, password_hash, entry_code, host_user_id, \
                            status, max_participants, duration_days, started_on, ends_on, created_at";

/// Battle room repository
pub struct BattleRepository;

impl BattleRepository {
    /// Create a new room in WAITING state
    pub async fn create_room(pool: &PgPool, input: CreateRoom) -> Result<RoomRecord> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            INSERT INTO battle_rooms
                (name, description, password_hash, entry_code, host_user_id,
                 max_participants, duration_days)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, name, description, password_hash, entry_code, host_user_id,
                      status, max_participants, duration_days, started_on, ends_on, created_at
            "#,
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(&input.password_hash)
        .bind(&input.entry_code)
        .bind(input.host_user_id)
        .bind(input.max_participants)
        .bind(input.duration_days)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Find a room by its public entry code
    pub async fn find_by_entry_code(pool: &PgPool, entry_code: &str) -> Result<Option<RoomRecord>> {
        let record = sqlx::query_as::<_, RoomRecord>(&format!(
            "SELECT {ROOM_COLUMNS} FROM battle_rooms WHERE entry_code = $1"
        ))
        .bind(entry_code)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Get a room by ID
    pub async fn get_by_id(pool: &PgPool, id: Uuid) -> Result<Option<RoomRecord>> {
        let record = sqlx::query_as::<_, RoomRecord>(&format!(
            "SELECT {ROOM_COLUMNS} FROM battle_rooms WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Whether an entry code is already taken
    pub async fn entry_code_exists(pool: &PgPool, entry_code: &str) -> Result<bool> {
        let exists: (bool,) =
            sqlx::query_as(r#"SELECT EXISTS(SELECT 1 FROM battle_rooms WHERE entry_code = $1)"#)
                .bind(entry_code)
                .fetch_one(pool)
                .await?;

        Ok(exists.0)
    }

    /// Rooms the user participates in, newest first
    pub async fn list_for_user(pool: &PgPool, user_id: Uuid) -> Result<Vec<RoomRecord>> {
        let records = sqlx::query_as::<_, RoomRecord>(
            r#"
            SELECT r.id, r.name, r.description, r.password_hash, r.entry_code, r.host_user_id,
                   r.status, r.max_participants, r.duration_days, r.started_on, r.ends_on,
                   r.created_at
            FROM battle_rooms r
            JOIN battle_participants p ON p.room_id = r.id
            WHERE p.user_id = $1
            ORDER BY r.created_at DESC
            "#,
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Add a participant while enforcing capacity and membership invariants.
    ///
    /// Locks the room row for the duration of the check-then-insert so two
    /// concurrent joins cannot both pass the capacity check.
    pub async fn add_participant(
        pool: &PgPool,
        room_id: Uuid,
        user_id: Uuid,
        nickname: &str,
    ) -> Result<JoinOutcome> {
        let mut tx = pool.begin().await?;

        // A room deleted between lookup and lock is simply no longer joinable
        let lock_sql = format!("SELECT {ROOM_COLUMNS} FROM battle_rooms WHERE id = $1 FOR UPDATE");
        let Some(room) = sqlx::query_as::<_, RoomRecord>(&lock_sql)
            .bind(room_id)
            .fetch_optional(&mut *tx)
            .await?
        else {
            return Ok(JoinOutcome::NotWaiting);
        };

        if room.status != "WAITING" {
            return Ok(JoinOutcome::NotWaiting);
        }

        let already: (bool,) = sqlx::query_as(
            r#"SELECT EXISTS(SELECT 1 FROM battle_participants WHERE room_id = $1 AND user_id = $2)"#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_one(&mut *tx)
        .await?;
        if already.0 {
            return Ok(JoinOutcome::AlreadyMember);
        }

        let count: (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM battle_participants WHERE room_id = $1"#)
                .bind(room_id)
                .fetch_one(&mut *tx)
                .await?;
        if count.0 >= room.max_participants as i64 {
            return Ok(JoinOutcome::RoomFull);
        }

        let participant = sqlx::query_as::<_, ParticipantRecord>(
            r#"
            INSERT INTO battle_participants (room_id, user_id, nickname)
            VALUES ($1, $2, $3)
            RETURNING id, room_id, user_id, nickname, goal_type, target_weight_kg,
                      starting_weight_kg, joined_at
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .bind(nickname)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(JoinOutcome::Joined(participant))
    }

    /// Participants of a room in join order
    pub async fn participants(pool: &PgPool, room_id: Uuid) -> Result<Vec<ParticipantRecord>> {
        let records = sqlx::query_as::<_, ParticipantRecord>(
            r#"
            SELECT id, room_id, user_id, nickname, goal_type, target_weight_kg,
                   starting_weight_kg, joined_at
            FROM battle_participants
            WHERE room_id = $1
            ORDER BY joined_at ASC
            "#,
        )
        .bind(room_id)
        .fetch_all(pool)
        .await?;

        Ok(records)
    }

    /// Find one participant of a room
    pub async fn find_participant(
        pool: &PgPool,
        room_id: Uuid,
        user_id: Uuid,
    ) -> Result<Option<ParticipantRecord>> {
        let record = sqlx::query_as::<_, ParticipantRecord>(
            r#"
            SELECT id, room_id, user_id, nickname, goal_type, target_weight_kg,
                   starting_weight_kg, joined_at
            FROM battle_participants
            WHERE room_id = $1 AND user_id = $2
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Set or replace a participant's personal goal
    pub async fn set_participant_goal(
        pool: &PgPool,
        room_id: Uuid,
        user_id: Uuid,
        goal_type: &str,
        target_weight_kg: f64,
        starting_weight_kg: f64,
    ) -> Result<Option<ParticipantRecord>> {
        let record = sqlx::query_as::<_, ParticipantRecord>(
            r#"
            UPDATE battle_participants
            SET goal_type = $3, target_weight_kg = $4, starting_weight_kg = $5
            WHERE room_id = $1 AND user_id = $2
            RETURNING id, room_id, user_id, nickname, goal_type, target_weight_kg,
                      starting_weight_kg, joined_at
            "#,
        )
        .bind(room_id)
        .bind(user_id)
        .bind(goal_type)
        .bind(target_weight_kg)
        .bind(starting_weight_kg)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Move a room from WAITING to IN_PROGRESS with its date window.
    ///
    /// The WHERE clause doubles as an optimistic guard: a room that
    /// already left WAITING yields no row.
    pub async fn start_room(
        pool: &PgPool,
        room_id: Uuid,
        started_on: NaiveDate,
        ends_on: NaiveDate,
    ) -> Result<Option<RoomRecord>> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            UPDATE battle_rooms
            SET status = 'IN_PROGRESS', started_on = $2, ends_on = $3
            WHERE id = $1 AND status = 'WAITING'
            RETURNING id, name, description, password_hash, entry_code, host_user_id,
                      status, max_participants, duration_days, started_on, ends_on, created_at
            "#,
        )
        .bind(room_id)
        .bind(started_on)
        .bind(ends_on)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Cancel a WAITING room
    pub async fn cancel_room(pool: &PgPool, room_id: Uuid) -> Result<Option<RoomRecord>> {
        let record = sqlx::query_as::<_, RoomRecord>(
            r#"
            UPDATE battle_rooms
            SET status = 'CANCELLED'
            WHERE id = $1 AND status = 'WAITING'
            RETURNING id, name, description, password_hash, entry_code, host_user_id,
                      status, max_participants, duration_days, started_on, ends_on, created_at
            "#,
        )
        .bind(room_id)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }

    /// Remove a participant; returns true if a row was deleted
    pub async fn remove_participant(pool: &PgPool, room_id: Uuid, user_id: Uuid) -> Result<bool> {
        let result = sqlx::query(
            r#"DELETE FROM battle_participants WHERE room_id = $1 AND user_id = $2"#,
        )
        .bind(room_id)
        .bind(user_id)
        .execute(pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count participants of a room
    pub async fn count_participants(pool: &PgPool, room_id: Uuid) -> Result<i64> {
        let count: (i64,) =
            sqlx::query_as(r#"SELECT COUNT(*) FROM battle_participants WHERE room_id = $1"#)
                .bind(room_id)
                .fetch_one(pool)
                .await?;

        Ok(count.0)
    }

    /// Delete an empty room
    pub async fn delete_room(pool: &PgPool, room_id: Uuid) -> Result<bool> {
        let result = sqlx::query(r#"DELETE FROM battle_rooms WHERE id = $1"#)
            .bind(room_id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Hand the room to a new host
    pub async fn transfer_host(pool: &PgPool, room_id: Uuid, new_host: Uuid) -> Result<()> {
        sqlx::query(r#"UPDATE battle_rooms SET host_user_id = $2 WHERE id = $1"#)
            .bind(room_id)
            .bind(new_host)
            .execute(pool)
            .await?;

        Ok(())
    }

    /// Store a new invite token for a room
    pub async fn create_invite(
        pool: &PgPool,
        room_id: Uuid,
        created_by: Uuid,
        token: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<InviteRecord> {
        let record = sqlx::query_as::<_, InviteRecord>(
            r#"
            INSERT INTO room_invites (room_id, created_by, token, expires_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, room_id, created_by, token, expires_at, created_at
            "#,
        )
        .bind(room_id)
        .bind(created_by)
        .bind(token)
        .bind(expires_at)
        .fetch_one(pool)
        .await?;

        Ok(record)
    }

    /// Look up an invite by its token
    pub async fn find_invite_by_token(pool: &PgPool, token: &str) -> Result<Option<InviteRecord>> {
        let record = sqlx::query_as::<_, InviteRecord>(
            r#"
            SELECT id, room_id, created_by, token, expires_at, created_at
            FROM room_invites
            WHERE token = $1
            "#,
        )
        .bind(token)
        .fetch_optional(pool)
        .await?;

        Ok(record)
    }
}
