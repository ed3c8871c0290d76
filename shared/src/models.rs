//! Data models for the Weighin application

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// User account
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    /// Display name shown to other participants in battle rooms
    pub nickname: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Derived status of a weight goal
///
/// Never persisted; recomputed from stored facts on every read.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum GoalStatus {
    Active,
    Completed,
    Failed,
}

/// The kind of goal a participant pursues inside a battle room
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BattleGoalType {
    WeightLoss,
    WeightGain,
    Maintain,
}

impl BattleGoalType {
    /// MAINTAIN goals pin the target to the starting snapshot instead
    pub fn requires_target(self) -> bool {
        !matches!(self, BattleGoalType::Maintain)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BattleGoalType::WeightLoss => "WEIGHT_LOSS",
            BattleGoalType::WeightGain => "WEIGHT_GAIN",
            BattleGoalType::Maintain => "MAINTAIN",
        }
    }
}

impl FromStr for BattleGoalType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WEIGHT_LOSS" => Ok(BattleGoalType::WeightLoss),
            "WEIGHT_GAIN" => Ok(BattleGoalType::WeightGain),
            "MAINTAIN" => Ok(BattleGoalType::Maintain),
            other => Err(format!("unknown battle goal type: {other}")),
        }
    }
}

/// Battle room lifecycle state
///
/// Transitions are monotonic: WAITING -> IN_PROGRESS -> ENDED, with
/// CANCELLED reachable from WAITING only.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoomStatus {
    Waiting,
    InProgress,
    Ended,
    Cancelled,
}

impl RoomStatus {
    /// Legal state transitions for a battle room
    pub fn can_transition_to(self, next: RoomStatus) -> bool {
        matches!(
            (self, next),
            (RoomStatus::Waiting, RoomStatus::InProgress)
                | (RoomStatus::Waiting, RoomStatus::Cancelled)
                | (RoomStatus::InProgress, RoomStatus::Ended)
        )
    }

    /// Whether new participants may still join
    pub fn is_joinable(self) -> bool {
        matches!(self, RoomStatus::Waiting)
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, RoomStatus::Ended | RoomStatus::Cancelled)
    }

    /// Status as observed by readers.
    ///
    /// A stored IN_PROGRESS room whose end date has passed reads as ENDED.
    /// The stored row is never mutated for this; ending is a projection
    /// over the duration facts.
    pub fn effective_on(self, ends_on: Option<NaiveDate>, today: NaiveDate) -> RoomStatus {
        match (self, ends_on) {
            (RoomStatus::InProgress, Some(end)) if today > end => RoomStatus::Ended,
            _ => self,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            RoomStatus::Waiting => "WAITING",
            RoomStatus::InProgress => "IN_PROGRESS",
            RoomStatus::Ended => "ENDED",
            RoomStatus::Cancelled => "CANCELLED",
        }
    }
}

impl FromStr for RoomStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "WAITING" => Ok(RoomStatus::Waiting),
            "IN_PROGRESS" => Ok(RoomStatus::InProgress),
            "ENDED" => Ok(RoomStatus::Ended),
            "CANCELLED" => Ok(RoomStatus::Cancelled),
            other => Err(format!("unknown room status: {other}")),
        }
    }
}

impl fmt::Display for RoomStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Standing of the acting user against one opponent
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Standing {
    Leading,
    Trailing,
    Tied,
}

/// Minimum number of participants for a battle to start
pub const MIN_PARTICIPANTS: usize = 2;

/// Guard for the WAITING -> IN_PROGRESS transition.
///
/// Both failure modes are reported distinctly: a room that is too small and
/// a room where members have not set their goal are different user errors.
pub fn check_start(
    participant_count: usize,
    missing_goals: &[String],
) -> Result<(), crate::errors::StartRejection> {
    use crate::errors::StartRejection;

    if participant_count < MIN_PARTICIPANTS {
        return Err(StartRejection::NotEnoughParticipants {
            current: participant_count,
            min: MIN_PARTICIPANTS,
        });
    }
    if !missing_goals.is_empty() {
        return Err(StartRejection::GoalsNotSet {
            nicknames: missing_goals.to_vec(),
        });
    }
    Ok(())
}
