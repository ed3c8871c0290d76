//! Battle invitation service
//!
//! Mints invite tokens and formats the join link plus the human-readable
//! share message handed to the client's share sheet. The token is a
//! capability scoped to one room: whoever holds it joins without the
//! password, so the password never rides along in share text or URLs.

use crate::config::InviteConfig;
use crate::error::ApiError;
use crate::repositories::{battle::InviteRecord, BattleRepository};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;
use weighin_shared::models::RoomStatus;

/// A freshly minted invite
#[derive(Debug, Clone)]
pub struct Invite {
    pub invite_url: String,
    pub share_message: String,
    pub expires_at: DateTime<Utc>,
}

/// Battle invitation service
pub struct InviteService;

impl InviteService {
    /// Create an invite for a room the caller belongs to
    pub async fn create(
        pool: &PgPool,
        config: &InviteConfig,
        user_id: Uuid,
        room_id: Uuid,
    ) -> Result<Invite, ApiError> {
        let room = BattleRepository::get_by_id(pool, room_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::NotFound("Room not found".to_string()))?;

        BattleRepository::find_participant(pool, room_id, user_id)
            .await
            .map_err(ApiError::Internal)?
            .ok_or_else(|| ApiError::Forbidden("Only members can share invites".to_string()))?;

        let status = room
            .status
            .parse::<RoomStatus>()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!(e)))?;
        if !status.is_joinable() {
            return Err(ApiError::Conflict(
                "Room is no longer accepting participants".to_string(),
            ));
        }

        let token = Uuid::new_v4().simple().to_string();
        let expires_at = Utc::now() + Duration::hours(config.token_ttl_hours);

        BattleRepository::create_invite(pool, room_id, user_id, &token, expires_at)
            .await
            .map_err(ApiError::Internal)?;

        let invite_url = Self::build_invite_url(&config.base_url, &room.entry_code, &token);
        let share_message = Self::build_share_message(&room.name, &room.entry_code, &invite_url);

        Ok(Invite {
            invite_url,
            share_message,
            expires_at,
        })
    }

    /// Join URL the client share sheet distributes
    pub fn build_invite_url(base_url: &str, entry_code: &str, token: &str) -> String {
        format!(
            "{}/join?room={}&invite={}",
            base_url.trim_end_matches('/'),
            entry_code,
            token
        )
    }

    /// Human-readable message embedding the room name, entry code and URL
    pub fn build_share_message(room_name: &str, entry_code: &str, invite_url: &str) -> String {
        format!(
            "Join my weight battle \"{room_name}\"! Room code {entry_code} - tap to join: {invite_url}"
        )
    }

    /// Whether a stored invite grants entry to the given room right now
    pub fn token_is_valid(invite: &InviteRecord, room_id: Uuid, now: DateTime<Utc>) -> bool {
        invite.room_id == room_id && invite.expires_at > now
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn invite(room_id: Uuid, expires_in_hours: i64) -> InviteRecord {
        InviteRecord {
            id: Uuid::new_v4(),
            room_id,
            created_by: Uuid::new_v4(),
            token: Uuid::new_v4().simple().to_string(),
            expires_at: Utc::now() + Duration::hours(expires_in_hours),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_invite_url_shape() {
        let url = InviteService::build_invite_url("https://weighin.app/", "XK42PD", "deadbeef");
        assert_eq!(url, "https://weighin.app/join?room=XK42PD&invite=deadbeef");
    }

    #[test]
    fn test_share_message_embeds_code_and_url() {
        let url = InviteService::build_invite_url("https://weighin.app", "XK42PD", "tok");
        let message = InviteService::build_share_message("summer shred", "XK42PD", &url);
        assert!(message.contains("summer shred"));
        assert!(message.contains("XK42PD"));
        assert!(message.contains(&url));
    }

    #[test]
    fn test_share_artifacts_never_carry_a_password() {
        // The formatting layer has no password input at all; the URL only
        // ever holds the public code and the capability token
        let url = InviteService::build_invite_url("https://weighin.app", "XK42PD", "tok");
        assert!(!url.contains("password"));
        let message = InviteService::build_share_message("room", "XK42PD", &url);
        assert!(!message.contains("password"));
    }

    #[test]
    fn test_token_validity_window() {
        let room_id = Uuid::new_v4();
        let now = Utc::now();

        assert!(InviteService::token_is_valid(&invite(room_id, 1), room_id, now));
        // Expired
        assert!(!InviteService::token_is_valid(&invite(room_id, -1), room_id, now));
        // Wrong room
        assert!(!InviteService::token_is_valid(
            &invite(Uuid::new_v4(), 1),
            room_id,
            now
        ));
    }
}
