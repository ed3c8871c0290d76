//! Business logic services
//!
//! Services encapsulate business logic and coordinate between
//! repositories and the pure domain rules in the shared crate.

pub mod battle;
pub mod export;
pub mod goals;
pub mod invite;
pub mod user;
pub mod weight;

pub use battle::BattleService;
pub use export::ExportService;
pub use goals::GoalService;
pub use invite::InviteService;
pub use user::UserService;
pub use weight::WeightService;
