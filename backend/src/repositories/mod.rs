//! Database repositories
//!
//! Provides data access layer for database operations.

pub mod battle;
pub mod goals;
pub mod user;
pub mod weight;

pub use battle::{
    BattleRepository, CreateRoom, InviteRecord, JoinOutcome, ParticipantRecord, RoomRecord,
};
pub use goals::{CreateGoal, GoalRepository};
pub use user::UserRepository;
pub use weight::WeightRepository;
