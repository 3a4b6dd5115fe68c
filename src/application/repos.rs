//! Repository traits describing persistence adapters.

use async_trait::async_trait;
use thiserror::Error;
use time::OffsetDateTime;

use crate::domain::entities::{NewSubject, SubjectRecord};
use crate::domain::filter::SubjectFilter;
use crate::domain::window::StatWindow;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error("persistence error: {0}")]
    Persistence(String),
    #[error("resource not found")]
    NotFound,
    #[error("subject is already inactive")]
    AlreadyInactive,
    #[error("invalid input: {message}")]
    InvalidInput { message: String },
    #[error("database unreachable: {0}")]
    Connection(String),
}

impl RepoError {
    pub fn from_persistence(err: impl std::fmt::Display) -> Self {
        Self::Persistence(err.to_string())
    }
}

#[async_trait]
pub trait SubjectsRepo: Send + Sync {
    async fn create_subject(&self, subject: NewSubject) -> Result<SubjectRecord, RepoError>;

    async fn find_subject(&self, id: i64) -> Result<Option<SubjectRecord>, RepoError>;

    /// Marks the subject inactive and stamps `delete_at`, failing with
    /// [`RepoError::AlreadyInactive`] if it was retired before.
    async fn soft_delete_subject(&self, id: i64) -> Result<SubjectRecord, RepoError>;

    async fn list_subjects(&self, filter: &SubjectFilter)
    -> Result<Vec<SubjectRecord>, RepoError>;
}

/// Aggregate measurements over the subjects existing in a window.
/// Fields are `None` when the window holds no subjects at all.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SubjectAggregates {
    pub total_count: i64,
    pub average_length: Option<f64>,
    pub average_weight: Option<f64>,
    pub max_length: Option<f64>,
    pub min_length: Option<f64>,
    pub max_weight: Option<f64>,
    pub min_weight: Option<f64>,
    pub total_weight: Option<f64>,
}

/// Longest and shortest storage stay among subjects retired in a
/// window, in seconds. `None` when nothing was retired there.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DurationBounds {
    pub max_seconds: Option<f64>,
    pub min_seconds: Option<f64>,
}

/// The minimal per-subject row needed to replay daily membership.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubjectLifetime {
    pub create_at: OffsetDateTime,
    pub delete_at: Option<OffsetDateTime>,
    pub weight: f64,
}

#[async_trait]
pub trait StatisticsRepo: Send + Sync {
    async fn earliest_create_at(&self) -> Result<Option<OffsetDateTime>, RepoError>;

    async fn count_created(&self, window: &StatWindow) -> Result<i64, RepoError>;

    async fn count_deleted(&self, window: &StatWindow) -> Result<i64, RepoError>;

    async fn subject_aggregates(&self, window: &StatWindow)
    -> Result<SubjectAggregates, RepoError>;

    async fn storage_durations(&self, window: &StatWindow) -> Result<DurationBounds, RepoError>;

    /// Lifetimes of every subject that existed at some point inside the
    /// window, for day-by-day replay.
    async fn subject_lifetimes(&self, window: &StatWindow)
    -> Result<Vec<SubjectLifetime>, RepoError>;
}
