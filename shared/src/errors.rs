//! Domain error types for the Weighin application

use thiserror::Error;

/// Why a battle room refused to start
///
/// The start guard must report which rule failed; callers surface these as
/// distinct error codes rather than a generic failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StartRejection {
    #[error("room needs at least {min} participants to start, has {current}")]
    NotEnoughParticipants { current: usize, min: usize },

    #[error("goals not set for: {}", nicknames.join(", "))]
    GoalsNotSet { nicknames: Vec<String> },
}

impl StartRejection {
    /// Stable machine-readable code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            StartRejection::NotEnoughParticipants { .. } => "NOT_ENOUGH_PARTICIPANTS",
            StartRejection::GoalsNotSet { .. } => "GOALS_NOT_SET",
        }
    }
}

/// Why a join attempt was refused
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum JoinRejection {
    #[error("room is full")]
    RoomFull,

    #[error("already a member of this room")]
    AlreadyMember,

    #[error("room is no longer accepting participants")]
    NotJoinable,

    #[error("wrong password")]
    WrongPassword,

    #[error("invite is invalid or expired")]
    InvalidInvite,
}

impl JoinRejection {
    pub fn code(&self) -> &'static str {
        match self {
            JoinRejection::RoomFull => "ROOM_FULL",
            JoinRejection::AlreadyMember => "ALREADY_MEMBER",
            JoinRejection::NotJoinable => "NOT_JOINABLE",
            JoinRejection::WrongPassword => "WRONG_PASSWORD",
            JoinRejection::InvalidInvite => "INVALID_INVITE",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_goals_not_set_names_participants() {
        let rejection = StartRejection::GoalsNotSet {
            nicknames: vec!["mina".to_string(), "jun".to_string()],
        };
        assert_eq!(rejection.to_string(), "goals not set for: mina, jun");
        assert_eq!(rejection.code(), "GOALS_NOT_SET");
    }

    #[test]
    fn test_not_enough_participants_message() {
        let rejection = StartRejection::NotEnoughParticipants { current: 1, min: 2 };
        assert_eq!(
            rejection.to_string(),
            "room needs at least 2 participants to start, has 1"
        );
    }

    #[test]
    fn test_join_rejection_codes_are_distinct() {
        let all = [
            JoinRejection::RoomFull,
            JoinRejection::AlreadyMember,
            JoinRejection::NotJoinable,
            JoinRejection::WrongPassword,
            JoinRejection::InvalidInvite,
        ];
        let mut codes: Vec<_> = all.iter().map(|r| r.code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), all.len());
    }
}
