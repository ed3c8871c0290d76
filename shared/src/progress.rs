//! Goal and battle progress calculations
//!
//! All functions here are pure projections over stored facts: a goal's
//! progress and status are computed from its snapshot, the latest recorded
//! weight and the clock, never persisted.

use crate::models::{GoalStatus, Standing};
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Tolerance band for deciding pass/fail at a goal's end date
pub const GOAL_TOLERANCE_KG: f64 = 0.5;

/// Percentage of the way from the starting weight to the target.
///
/// Clamped to [0, 100]. A target equal to the start is the degenerate
/// maintain case and always reads as 100%.
pub fn progress_percent(start_kg: f64, target_kg: f64, current_kg: f64) -> f64 {
    let span = target_kg - start_kg;
    if span == 0.0 {
        return 100.0;
    }
    let progress = (current_kg - start_kg) / span * 100.0;
    progress.clamp(0.0, 100.0)
}

/// Result of evaluating a goal against the current weight and the clock
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GoalEvaluation {
    pub progress_percent: f64,
    pub status: GoalStatus,
}

/// Evaluate a goal.
///
/// Active while `now` has not passed `end_at`. Afterwards the final weight
/// decides: within [`GOAL_TOLERANCE_KG`] of the target is COMPLETED,
/// anything else FAILED. With no recorded weight yet, progress is zero and
/// the goal stays ACTIVE until its window closes.
pub fn evaluate_goal(
    start_kg: f64,
    target_kg: f64,
    current_kg: Option<f64>,
    now: DateTime<Utc>,
    end_at: DateTime<Utc>,
) -> GoalEvaluation {
    let percent = current_kg.map_or(0.0, |w| progress_percent(start_kg, target_kg, w));

    let status = if now <= end_at {
        GoalStatus::Active
    } else {
        match current_kg {
            Some(w) if (w - target_kg).abs() <= GOAL_TOLERANCE_KG => GoalStatus::Completed,
            _ => GoalStatus::Failed,
        }
    };

    GoalEvaluation {
        progress_percent: percent,
        status,
    }
}

/// Fraction of a battle's planned duration that has elapsed, clamped [0, 1]
pub fn elapsed_fraction(started_on: NaiveDate, today: NaiveDate, duration_days: i64) -> f64 {
    if duration_days <= 0 {
        return 1.0;
    }
    let elapsed = (today - started_on).num_days();
    (elapsed as f64 / duration_days as f64).clamp(0.0, 1.0)
}

/// Compare the acting user's completion against one opponent.
///
/// The greater percentage leads; equal values tie. No weighting or
/// handicap system.
pub fn standing(own_percent: f64, opponent_percent: f64) -> Standing {
    if own_percent > opponent_percent {
        Standing::Leading
    } else if own_percent < opponent_percent {
        Standing::Trailing
    } else {
        Standing::Tied
    }
}
