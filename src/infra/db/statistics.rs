use async_trait::async_trait;
use time::OffsetDateTime;

use crate::{
    application::repos::{
        DurationBounds, RepoError, StatisticsRepo, SubjectAggregates, SubjectLifetime,
    },
    domain::StatWindow,
};

use super::{PostgresStore, map_sqlx_error};

#[derive(sqlx::FromRow)]
struct AggregateRow {
    total_count: i64,
    average_length: Option<f64>,
    average_weight: Option<f64>,
    max_length: Option<f64>,
    min_length: Option<f64>,
    max_weight: Option<f64>,
    min_weight: Option<f64>,
    total_weight: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct DurationRow {
    max_seconds: Option<f64>,
    min_seconds: Option<f64>,
}

#[derive(sqlx::FromRow)]
struct LifetimeRow {
    create_at: OffsetDateTime,
    delete_at: Option<OffsetDateTime>,
    weight: f64,
}

#[async_trait]
impl StatisticsRepo for PostgresStore {
    async fn earliest_create_at(&self) -> Result<Option<OffsetDateTime>, RepoError> {
        sqlx::query_scalar::<_, Option<OffsetDateTime>>("SELECT MIN(create_at) FROM subjects")
            .fetch_one(self.pool())
            .await
            .map_err(map_sqlx_error)
    }

    async fn count_created(&self, window: &StatWindow) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subjects WHERE create_at >= $1 AND create_at <= $2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn count_deleted(&self, window: &StatWindow) -> Result<i64, RepoError> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM subjects \
             WHERE is_active = FALSE AND delete_at >= $1 AND delete_at <= $2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)
    }

    async fn subject_aggregates(&self, window: &StatWindow) -> Result<SubjectAggregates, RepoError> {
        // A subject counts while it exists inside the window: created no
        // later than the window end, and not retired before it opened.
        let row = sqlx::query_as::<_, AggregateRow>(
            "SELECT COUNT(*) AS total_count, \
                    AVG(length) AS average_length, \
                    AVG(weight) AS average_weight, \
                    MAX(length) AS max_length, \
                    MIN(length) AS min_length, \
                    MAX(weight) AS max_weight, \
                    MIN(weight) AS min_weight, \
                    SUM(weight) AS total_weight \
             FROM subjects \
             WHERE create_at <= $2 AND (is_active = TRUE OR delete_at > $1)",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(SubjectAggregates {
            total_count: row.total_count,
            average_length: row.average_length,
            average_weight: row.average_weight,
            max_length: row.max_length,
            min_length: row.min_length,
            max_weight: row.max_weight,
            min_weight: row.min_weight,
            total_weight: row.total_weight,
        })
    }

    async fn storage_durations(&self, window: &StatWindow) -> Result<DurationBounds, RepoError> {
        // EXTRACT returns numeric; cast so the driver decodes a float.
        let row = sqlx::query_as::<_, DurationRow>(
            "SELECT MAX(EXTRACT(EPOCH FROM (delete_at - create_at))::double precision) AS max_seconds, \
                    MIN(EXTRACT(EPOCH FROM (delete_at - create_at))::double precision) AS min_seconds \
             FROM subjects \
             WHERE is_active = FALSE AND delete_at >= $1 AND delete_at <= $2",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_one(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(DurationBounds {
            max_seconds: row.max_seconds,
            min_seconds: row.min_seconds,
        })
    }

    async fn subject_lifetimes(&self, window: &StatWindow) -> Result<Vec<SubjectLifetime>, RepoError> {
        let rows = sqlx::query_as::<_, LifetimeRow>(
            "SELECT create_at, delete_at, weight FROM subjects \
             WHERE create_at <= $2 AND (is_active = TRUE OR delete_at > $1)",
        )
        .bind(window.start)
        .bind(window.end)
        .fetch_all(self.pool())
        .await
        .map_err(map_sqlx_error)?;

        Ok(rows
            .into_iter()
            .map(|row| SubjectLifetime {
                create_at: row.create_at,
                delete_at: row.delete_at,
                weight: row.weight,
            })
            .collect())
    }
}
