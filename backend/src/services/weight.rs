//! Weight tracking service
//!
//! Provides business logic for weight entries:
//! - One entry per calendar date (resubmission overwrites)
//! - Per-entry change against the previous entry, derived on read
//! - History aggregates and weekly bucketing

use crate::error::ApiError;
use crate::repositories::WeightRepository;
use chrono::{NaiveDate, Utc, Weekday};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;
use weighin_shared::validation;

/// One weight sample with its derived change
#[derive(Debug, Clone)]
pub struct WeightEntry {
    pub id: Uuid,
    pub date: NaiveDate,
    pub weight_kg: f64,
    pub change: Option<f64>,
}

/// Weight history with the aggregates shown on the dashboard
#[derive(Debug, Clone)]
pub struct WeightHistory {
    pub entries: Vec<WeightEntry>,
    pub current_weight: Option<f64>,
    pub total_change: Option<f64>,
    pub days_recorded: usize,
}

/// One week's aggregate
#[derive(Debug, Clone, PartialEq)]
pub struct WeeklyBucket {
    pub week_start: NaiveDate,
    pub average_weight: f64,
    pub change_from_previous_week: Option<f64>,
    pub entries_count: usize,
}

/// Weight service for business logic
pub struct WeightService;

impl WeightService {
    /// Record a weight for a calendar date.
    ///
    /// A second submission for the same date replaces the stored value;
    /// the series never grows two samples for one day.
    pub async fn log_weight(
        pool: &PgPool,
        user_id: Uuid,
        date: Option<NaiveDate>,
        weight_kg: f64,
    ) -> Result<WeightEntry, ApiError> {
        validation::validate_weight(weight_kg).map_err(ApiError::Validation)?;

        let date = date.unwrap_or_else(|| Utc::now().date_naive());

        let record = WeightRepository::upsert(pool, user_id, date, weight_kg)
            .await
            .map_err(ApiError::Internal)?;

        let previous = WeightRepository::get_previous(pool, user_id, date)
            .await
            .map_err(ApiError::Internal)?;

        let weight = decimal_to_f64(&record.weight_kg);
        let change = previous.map(|p| weight - decimal_to_f64(&p.weight_kg));

        Ok(WeightEntry {
            id: record.id,
            date: record.recorded_on,
            weight_kg: weight,
            change,
        })
    }

    /// Weight history for an optional date range, oldest first
    pub async fn get_history(
        pool: &PgPool,
        user_id: Uuid,
        start: Option<NaiveDate>,
        end: Option<NaiveDate>,
    ) -> Result<WeightHistory, ApiError> {
        let records = WeightRepository::get_range(pool, user_id, start, end)
            .await
            .map_err(ApiError::Internal)?;

        let samples: Vec<(Uuid, NaiveDate, f64)> = records
            .iter()
            .map(|r| (r.id, r.recorded_on, decimal_to_f64(&r.weight_kg)))
            .collect();

        let weights: Vec<f64> = samples.iter().map(|(_, _, w)| *w).collect();
        let changes = Self::changes(&weights);

        let entries: Vec<WeightEntry> = samples
            .into_iter()
            .zip(changes)
            .map(|((id, date, weight_kg), change)| WeightEntry {
                id,
                date,
                weight_kg,
                change,
            })
            .collect();

        let current_weight = weights.last().copied();
        let total_change = match (weights.first(), weights.last()) {
            (Some(first), Some(last)) => Some(last - first),
            _ => None,
        };

        Ok(WeightHistory {
            days_recorded: entries.len(),
            entries,
            current_weight,
            total_change,
        })
    }

    /// Weekly aggregation over the full history
    pub async fn weekly_summary(pool: &PgPool, user_id: Uuid) -> Result<Vec<WeeklyBucket>, ApiError> {
        let records = WeightRepository::get_range(pool, user_id, None, None)
            .await
            .map_err(ApiError::Internal)?;

        let samples: Vec<(NaiveDate, f64)> = records
            .iter()
            .map(|r| (r.recorded_on, decimal_to_f64(&r.weight_kg)))
            .collect();

        Ok(Self::bucket_weeks(&samples))
    }

    /// Per-entry deltas against the chronologically previous entry.
    ///
    /// Input is in ascending date order; the first entry has no change.
    pub fn changes(weights: &[f64]) -> Vec<Option<f64>> {
        weights
            .iter()
            .enumerate()
            .map(|(i, w)| if i == 0 { None } else { Some(w - weights[i - 1]) })
            .collect()
    }

    /// Monday of the week a date falls in
    pub fn week_start(date: NaiveDate) -> NaiveDate {
        date.week(Weekday::Mon).first_day()
    }

    /// Group date-ordered samples into Monday-start weeks.
    ///
    /// Each bucket carries the mean weight of its entries and the delta
    /// against the previous bucket's mean.
    pub fn bucket_weeks(samples: &[(NaiveDate, f64)]) -> Vec<WeeklyBucket> {
        let mut buckets: Vec<WeeklyBucket> = Vec::new();
        let mut current_week: Option<NaiveDate> = None;
        let mut sum = 0.0;
        let mut count = 0usize;

        let flush = |buckets: &mut Vec<WeeklyBucket>, week: NaiveDate, sum: f64, count: usize| {
            let average = sum / count as f64;
            let change = buckets.last().map(|prev| average - prev.average_weight);
            buckets.push(WeeklyBucket {
                week_start: week,
                average_weight: average,
                change_from_previous_week: change,
                entries_count: count,
            });
        };

        for &(date, weight) in samples {
            let week = Self::week_start(date);
            match current_week {
                Some(open) if open == week => {
                    sum += weight;
                    count += 1;
                }
                Some(open) => {
                    flush(&mut buckets, open, sum, count);
                    current_week = Some(week);
                    sum = weight;
                    count = 1;
                }
                None => {
                    current_week = Some(week);
                    sum = weight;
                    count = 1;
                }
            }
        }
        if let Some(open) = current_week {
            flush(&mut buckets, open, sum, count);
        }

        buckets
    }
}

/// Convert Decimal to f64
pub(crate) fn decimal_to_f64(d: &Decimal) -> f64 {
    d.to_f64().unwrap_or(0.0)
}

/// Days between two dates, never negative
pub(crate) fn days_between(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days().max(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_changes_pair_consecutive_entries() {
        let weights = vec![70.0, 69.0, 68.5];
        let changes = WeightService::changes(&weights);
        assert_eq!(changes[0], None);
        assert!((changes[1].unwrap() - (-1.0)).abs() < 1e-10);
        assert!((changes[2].unwrap() - (-0.5)).abs() < 1e-10);
    }

    #[test]
    fn test_changes_single_entry_has_none() {
        assert_eq!(WeightService::changes(&[72.5]), vec![None]);
        assert!(WeightService::changes(&[]).is_empty());
    }

    #[test]
    fn test_week_start_is_monday() {
        // 2024-03-15 is a Friday
        assert_eq!(WeightService::week_start(d(2024, 3, 15)), d(2024, 3, 11));
        // A Monday maps to itself
        assert_eq!(WeightService::week_start(d(2024, 3, 11)), d(2024, 3, 11));
        // Sunday belongs to the week that began the previous Monday
        assert_eq!(WeightService::week_start(d(2024, 3, 17)), d(2024, 3, 11));
    }

    #[test]
    fn test_bucket_weeks_averages_and_deltas() {
        let samples = vec![
            (d(2024, 3, 11), 71.0),
            (d(2024, 3, 13), 70.0),
            (d(2024, 3, 18), 69.5),
            (d(2024, 3, 20), 69.5),
        ];
        let buckets = WeightService::bucket_weeks(&samples);

        assert_eq!(buckets.len(), 2);
        assert_eq!(buckets[0].week_start, d(2024, 3, 11));
        assert!((buckets[0].average_weight - 70.5).abs() < 1e-10);
        assert_eq!(buckets[0].change_from_previous_week, None);
        assert_eq!(buckets[0].entries_count, 2);

        assert_eq!(buckets[1].week_start, d(2024, 3, 18));
        assert!((buckets[1].average_weight - 69.5).abs() < 1e-10);
        assert!((buckets[1].change_from_previous_week.unwrap() - (-1.0)).abs() < 1e-10);
    }

    #[test]
    fn test_bucket_weeks_skips_empty_weeks_without_padding() {
        // A two-week gap: the delta is still against the last recorded week
        let samples = vec![(d(2024, 3, 11), 70.0), (d(2024, 4, 1), 68.0)];
        let buckets = WeightService::bucket_weeks(&samples);

        assert_eq!(buckets.len(), 2);
        assert!((buckets[1].change_from_previous_week.unwrap() - (-2.0)).abs() < 1e-10);
    }

    #[test]
    fn test_bucket_weeks_empty_input() {
        assert!(WeightService::bucket_weeks(&[]).is_empty());
    }

    #[test]
    fn test_days_between_never_negative() {
        assert_eq!(days_between(d(2024, 3, 11), d(2024, 3, 15)), 4);
        assert_eq!(days_between(d(2024, 3, 15), d(2024, 3, 11)), 0);
    }
}
