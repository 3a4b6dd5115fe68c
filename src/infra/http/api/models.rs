use serde::{Deserialize, Serialize};

use crate::application::statistics::StorageStatistics;

#[derive(Debug, Deserialize, Serialize)]
pub struct SubjectCreateRequest {
    pub length: f64,
    pub weight: f64,
}

/// Storage statistics as served over the wire.
///
/// Aggregates arrive pre-rounded from the service. Per-day extremes are
/// rendered as `YYYY-MM-DD` and stay null when the daily breakdown was
/// unavailable.
#[derive(Debug, Serialize)]
pub struct StatisticsResponse {
    pub added_count: i64,
    pub deleted_count: i64,
    pub average_length: f64,
    pub average_weight: f64,
    pub max_length: f64,
    pub min_length: f64,
    pub max_weight: f64,
    pub min_weight: f64,
    pub total_weight: f64,
    pub total_count: i64,
    pub max_time_in_storage: Option<f64>,
    pub min_time_in_storage: Option<f64>,
    pub max_subjects_day: Option<String>,
    pub min_subjects_day: Option<String>,
    pub max_weight_day: Option<String>,
    pub min_weight_day: Option<String>,
}

impl From<StorageStatistics> for StatisticsResponse {
    fn from(stats: StorageStatistics) -> Self {
        Self {
            added_count: stats.added_count,
            deleted_count: stats.deleted_count,
            average_length: stats.average_length,
            average_weight: stats.average_weight,
            max_length: stats.max_length,
            min_length: stats.min_length,
            max_weight: stats.max_weight,
            min_weight: stats.min_weight,
            total_weight: stats.total_weight,
            total_count: stats.total_count,
            max_time_in_storage: stats.max_time_in_storage,
            min_time_in_storage: stats.min_time_in_storage,
            max_subjects_day: stats.max_subjects_day.map(|day| day.to_string()),
            min_subjects_day: stats.min_subjects_day.map(|day| day.to_string()),
            max_weight_day: stats.max_weight_day.map(|day| day.to_string()),
            min_weight_day: stats.min_weight_day.map(|day| day.to_string()),
        }
    }
}
