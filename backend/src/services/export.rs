//! Weight data export service
//!
//! CSV export of the full weight series, one row per recorded day.

use crate::error::ApiError;
use crate::services::weight::{WeightEntry, WeightService};
use sqlx::PgPool;
use uuid::Uuid;

/// Export service for business logic
pub struct ExportService;

impl ExportService {
    /// Export all weight entries as CSV, oldest first
    pub async fn weight_csv(pool: &PgPool, user_id: Uuid) -> Result<String, ApiError> {
        let history = WeightService::get_history(pool, user_id, None, None).await?;
        Self::to_csv(&history.entries)
    }

    fn to_csv(entries: &[WeightEntry]) -> Result<String, ApiError> {
        let mut writer = csv::Writer::from_writer(vec![]);

        writer
            .write_record(["date", "weight_kg", "change"])
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV write failed: {e}")))?;

        for entry in entries {
            writer
                .write_record([
                    entry.date.to_string(),
                    format!("{:.1}", entry.weight_kg),
                    entry.change.map(|c| format!("{c:+.1}")).unwrap_or_default(),
                ])
                .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV write failed: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV flush failed: {e}")))?;
        String::from_utf8(bytes)
            .map_err(|e| ApiError::Internal(anyhow::anyhow!("CSV is not UTF-8: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn entry(day: u32, weight: f64, change: Option<f64>) -> WeightEntry {
        WeightEntry {
            id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            weight_kg: weight,
            change,
        }
    }

    #[test]
    fn test_csv_header_and_rows() {
        let entries = vec![
            entry(1, 70.0, None),
            entry(2, 69.0, Some(-1.0)),
            entry(3, 68.5, Some(-0.5)),
        ];
        let csv = ExportService::to_csv(&entries).unwrap();
        let lines: Vec<&str> = csv.lines().collect();

        assert_eq!(lines[0], "date,weight_kg,change");
        assert_eq!(lines[1], "2024-03-01,70.0,");
        assert_eq!(lines[2], "2024-03-02,69.0,-1.0");
        assert_eq!(lines[3], "2024-03-03,68.5,-0.5");
    }

    #[test]
    fn test_csv_empty_series_has_header_only() {
        let csv = ExportService::to_csv(&[]).unwrap();
        assert_eq!(csv.trim(), "date,weight_kg,change");
    }
}
