use std::sync::Arc;

use time::{Date, OffsetDateTime};
use tracing::warn;

use crate::application::repos::{RepoError, StatisticsRepo, SubjectLifetime};
use crate::domain::window::{StatWindow, end_of_day, start_of_day};

/// The full statistics report over one day-aligned window.
///
/// Aggregates are zero, not null, when no subject existed in the
/// window. The storage-duration pair is null when nothing was retired
/// inside the window, and the per-day fields are null when the daily
/// breakdown could not be computed.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageStatistics {
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
    pub max_subjects_day: Option<Date>,
    pub min_subjects_day: Option<Date>,
    pub max_weight_day: Option<Date>,
    pub min_weight_day: Option<Date>,
}

/// Days on which subject count and total weight peaked and bottomed.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DayExtremes {
    pub max_subjects_day: Option<Date>,
    pub min_subjects_day: Option<Date>,
    pub max_weight_day: Option<Date>,
    pub min_weight_day: Option<Date>,
}

#[derive(Clone)]
pub struct StatisticsService {
    repo: Arc<dyn StatisticsRepo>,
}

impl StatisticsService {
    pub fn new(repo: Arc<dyn StatisticsRepo>) -> Self {
        Self { repo }
    }

    /// Collects statistics over the day-aligned window enclosing
    /// `start` and `end`. A missing `start` falls back to the earliest
    /// creation in the store, a missing `end` to the current time; an
    /// entirely empty store reports the current day with zeroes.
    pub async fn collect(
        &self,
        start: Option<OffsetDateTime>,
        end: Option<OffsetDateTime>,
    ) -> Result<StorageStatistics, RepoError> {
        let start = match start {
            Some(value) => value,
            None => self
                .repo
                .earliest_create_at()
                .await?
                .unwrap_or_else(OffsetDateTime::now_utc),
        };
        let end = end.unwrap_or_else(OffsetDateTime::now_utc);
        let window = StatWindow::enclosing(start, end);

        let (added_count, deleted_count, aggregates, durations) = tokio::try_join!(
            self.repo.count_created(&window),
            self.repo.count_deleted(&window),
            self.repo.subject_aggregates(&window),
            self.repo.storage_durations(&window),
        )?;

        // The daily breakdown is best-effort: losing it degrades the
        // response to nulls instead of failing the whole report.
        let extremes = match self.repo.subject_lifetimes(&window).await {
            Ok(lifetimes) => compute_day_extremes(&window, &lifetimes),
            Err(error) => {
                warn!(
                    target = "misura::statistics",
                    error = %error,
                    "daily breakdown unavailable, omitting per-day fields"
                );
                DayExtremes::default()
            }
        };

        Ok(StorageStatistics {
            added_count,
            deleted_count,
            average_length: round2(aggregates.average_length.unwrap_or(0.0)),
            average_weight: round2(aggregates.average_weight.unwrap_or(0.0)),
            max_length: round2(aggregates.max_length.unwrap_or(0.0)),
            min_length: round2(aggregates.min_length.unwrap_or(0.0)),
            max_weight: round2(aggregates.max_weight.unwrap_or(0.0)),
            min_weight: round2(aggregates.min_weight.unwrap_or(0.0)),
            total_weight: round2(aggregates.total_weight.unwrap_or(0.0)),
            total_count: aggregates.total_count,
            max_time_in_storage: durations.max_seconds.map(round2),
            min_time_in_storage: durations.min_seconds.map(round2),
            max_subjects_day: extremes.max_subjects_day,
            min_subjects_day: extremes.min_subjects_day,
            max_weight_day: extremes.max_weight_day,
            min_weight_day: extremes.min_weight_day,
        })
    }
}

/// Scans every day of the window once, counting the subjects alive on
/// it and summing their weight, then picks the four extreme days. The
/// chronologically first day wins a tie.
pub fn compute_day_extremes(window: &StatWindow, lifetimes: &[SubjectLifetime]) -> DayExtremes {
    let mut max_count: Option<(Date, usize)> = None;
    let mut min_count: Option<(Date, usize)> = None;
    let mut max_weight: Option<(Date, f64)> = None;
    let mut min_weight: Option<(Date, f64)> = None;

    for day in window.days() {
        let day_start = start_of_day(day);
        let day_end = end_of_day(day);

        let mut count = 0usize;
        let mut weight = 0.0f64;
        for subject in lifetimes {
            let alive = subject.create_at <= day_end
                && subject.delete_at.is_none_or(|deleted| deleted > day_start);
            if alive {
                count += 1;
                weight += subject.weight;
            }
        }

        if max_count.is_none_or(|(_, best)| count > best) {
            max_count = Some((day, count));
        }
        if min_count.is_none_or(|(_, best)| count < best) {
            min_count = Some((day, count));
        }
        if max_weight.is_none_or(|(_, best)| weight > best) {
            max_weight = Some((day, weight));
        }
        if min_weight.is_none_or(|(_, best)| weight < best) {
            min_weight = Some((day, weight));
        }
    }

    DayExtremes {
        max_subjects_day: max_count.map(|(day, _)| day),
        min_subjects_day: min_count.map(|(day, _)| day),
        max_weight_day: max_weight.map(|(day, _)| day),
        min_weight_day: min_weight.map(|(day, _)| day),
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use time::macros::{date, datetime};

    use super::*;

    fn lifetime(
        create: OffsetDateTime,
        delete: Option<OffsetDateTime>,
        weight: f64,
    ) -> SubjectLifetime {
        SubjectLifetime {
            create_at: create,
            delete_at: delete,
            weight,
        }
    }

    fn window(first: Date, last: Date) -> StatWindow {
        StatWindow {
            start: start_of_day(first),
            end: end_of_day(last),
        }
    }

    #[test]
    fn rounding_keeps_two_decimals() {
        assert_eq!(round2(22.0), 22.0);
        assert_eq!(round2(11.006), 11.01);
        assert_eq!(round2(11.004), 11.0);
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(-3.456), -3.46);
    }

    #[test]
    fn growing_population_peaks_on_the_last_day() {
        let lifetimes = vec![
            lifetime(datetime!(2026-12-01 10:00 UTC), None, 11.0),
            lifetime(datetime!(2026-12-01 11:00 UTC), None, 13.0),
            lifetime(datetime!(2026-12-07 09:00 UTC), None, 12.0),
            lifetime(datetime!(2026-12-08 09:00 UTC), None, 12.0),
            lifetime(datetime!(2026-12-09 09:00 UTC), None, 12.0),
        ];
        let extremes = compute_day_extremes(
            &window(date!(2026-12-01), date!(2026-12-09)),
            &lifetimes,
        );

        assert_eq!(extremes.max_subjects_day, Some(date!(2026-12-09)));
        assert_eq!(extremes.min_subjects_day, Some(date!(2026-12-01)));
        assert_eq!(extremes.max_weight_day, Some(date!(2026-12-09)));
        assert_eq!(extremes.min_weight_day, Some(date!(2026-12-01)));
    }

    #[test]
    fn deletion_day_still_counts_the_subject() {
        // Retired mid-day on the 5th, so the 5th still sees it and the
        // 6th does not.
        let lifetimes = vec![lifetime(
            datetime!(2026-12-03 08:00 UTC),
            Some(datetime!(2026-12-05 12:00 UTC)),
            10.0,
        )];
        let extremes = compute_day_extremes(
            &window(date!(2026-12-03), date!(2026-12-06)),
            &lifetimes,
        );

        assert_eq!(extremes.max_subjects_day, Some(date!(2026-12-03)));
        assert_eq!(extremes.min_subjects_day, Some(date!(2026-12-06)));
    }

    #[test]
    fn midnight_deletion_excludes_that_day() {
        // delete_at exactly at midnight is not strictly after the day
        // start, so the subject is gone for the whole day.
        let lifetimes = vec![lifetime(
            datetime!(2026-12-03 08:00 UTC),
            Some(datetime!(2026-12-05 00:00 UTC)),
            10.0,
        )];
        let extremes = compute_day_extremes(
            &window(date!(2026-12-04), date!(2026-12-05)),
            &lifetimes,
        );

        assert_eq!(extremes.max_subjects_day, Some(date!(2026-12-04)));
        assert_eq!(extremes.min_subjects_day, Some(date!(2026-12-05)));
    }

    #[test]
    fn ties_pick_the_earliest_day() {
        let lifetimes = vec![lifetime(datetime!(2026-11-30 10:00 UTC), None, 10.0)];
        let extremes = compute_day_extremes(
            &window(date!(2026-12-01), date!(2026-12-03)),
            &lifetimes,
        );

        // Every day holds the same single subject.
        assert_eq!(extremes.max_subjects_day, Some(date!(2026-12-01)));
        assert_eq!(extremes.min_subjects_day, Some(date!(2026-12-01)));
        assert_eq!(extremes.max_weight_day, Some(date!(2026-12-01)));
        assert_eq!(extremes.min_weight_day, Some(date!(2026-12-01)));
    }

    #[test]
    fn no_subjects_still_names_a_day() {
        let extremes = compute_day_extremes(&window(date!(2026-12-01), date!(2026-12-02)), &[]);
        assert_eq!(extremes.max_subjects_day, Some(date!(2026-12-01)));
        assert_eq!(extremes.min_subjects_day, Some(date!(2026-12-01)));
    }

    #[test]
    fn inverted_window_yields_no_days() {
        let inverted = StatWindow {
            start: start_of_day(date!(2026-12-09)),
            end: end_of_day(date!(2026-12-01)),
        };
        assert_eq!(compute_day_extremes(&inverted, &[]), DayExtremes::default());
    }
}
