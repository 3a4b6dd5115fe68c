use std::sync::Arc;

use metrics::counter;
use thiserror::Error;
use tracing::debug;

use crate::application::repos::{RepoError, SubjectsRepo};
use crate::cache::{ListCache, list_key};
use crate::domain::entities::{NewSubject, SubjectRecord};
use crate::domain::filter::SubjectFilter;

const METRIC_CACHE_HIT: &str = "misura_cache_hit_total";
const METRIC_CACHE_MISS: &str = "misura_cache_miss_total";
const METRIC_CACHE_STORE: &str = "misura_cache_store_total";
const METRIC_CACHE_INVALIDATE: &str = "misura_cache_invalidate_total";

#[derive(Debug, Error)]
pub enum SubjectError {
    #[error("invalid {field}: {reason}")]
    Validation {
        field: &'static str,
        reason: &'static str,
    },
    #[error(transparent)]
    Repo(#[from] RepoError),
}

/// A list result plus where it came from, so the transport layer can
/// expose cache behavior without the service leaking cache types.
#[derive(Debug, Clone)]
pub struct ListOutcome {
    pub subjects: Vec<SubjectRecord>,
    pub cache_hit: bool,
}

#[derive(Clone)]
pub struct SubjectService {
    repo: Arc<dyn SubjectsRepo>,
    cache: Option<Arc<dyn ListCache>>,
}

impl SubjectService {
    pub fn new(repo: Arc<dyn SubjectsRepo>) -> Self {
        Self { repo, cache: None }
    }

    /// Attach the list cache; `None` leaves the service cacheless.
    pub fn with_list_cache(mut self, cache: Option<Arc<dyn ListCache>>) -> Self {
        self.cache = cache;
        self
    }

    pub async fn create(&self, subject: NewSubject) -> Result<SubjectRecord, SubjectError> {
        ensure_positive(subject.length, "length")?;
        ensure_positive(subject.weight, "weight")?;

        let record = self.repo.create_subject(subject).await?;
        self.invalidate_cached_lists().await;

        Ok(record)
    }

    pub async fn get(&self, id: i64) -> Result<SubjectRecord, SubjectError> {
        let record = self
            .repo
            .find_subject(id)
            .await?
            .ok_or(SubjectError::Repo(RepoError::NotFound))?;
        Ok(record)
    }

    pub async fn delete(&self, id: i64) -> Result<SubjectRecord, SubjectError> {
        let record = self.repo.soft_delete_subject(id).await?;
        self.invalidate_cached_lists().await;

        Ok(record)
    }

    /// Lists subjects matching `filter`, serving from the cache when a
    /// fresh entry exists. Only non-empty results are cached.
    pub async fn list(&self, filter: &SubjectFilter) -> Result<ListOutcome, SubjectError> {
        if let Some(cache) = &self.cache {
            if let Some(subjects) = cache.get_list(filter).await {
                counter!(METRIC_CACHE_HIT).increment(1);
                debug!(
                    target = "misura::subjects",
                    key = %list_key(filter),
                    "serving list from cache"
                );
                return Ok(ListOutcome {
                    subjects,
                    cache_hit: true,
                });
            }
            counter!(METRIC_CACHE_MISS).increment(1);
        }

        let subjects = self.repo.list_subjects(filter).await?;

        if let Some(cache) = &self.cache
            && !subjects.is_empty()
        {
            cache.put_list(filter, &subjects).await;
            counter!(METRIC_CACHE_STORE).increment(1);
        }

        Ok(ListOutcome {
            subjects,
            cache_hit: false,
        })
    }

    /// Every mutation sweeps the cached lists; the sweep is best-effort
    /// and short TTLs bound the staleness when it fails.
    async fn invalidate_cached_lists(&self) {
        if let Some(cache) = &self.cache {
            cache.invalidate_lists().await;
            counter!(METRIC_CACHE_INVALIDATE).increment(1);
        }
    }
}

fn ensure_positive(value: f64, field: &'static str) -> Result<(), SubjectError> {
    if !value.is_finite() {
        return Err(SubjectError::Validation {
            field,
            reason: "must be a finite number",
        });
    }
    if value <= 0.0 {
        return Err(SubjectError::Validation {
            field,
            reason: "must be greater than zero",
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positive_measurements_pass() {
        assert!(ensure_positive(0.1, "length").is_ok());
        assert!(ensure_positive(100_000.5, "weight").is_ok());
    }

    #[test]
    fn zero_and_negative_measurements_fail() {
        for value in [0.0, -0.1, -1.0, -100_000.0] {
            let err = ensure_positive(value, "length").unwrap_err();
            assert!(matches!(
                err,
                SubjectError::Validation { field: "length", .. }
            ));
        }
    }

    #[test]
    fn non_finite_measurements_fail() {
        for value in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            assert!(ensure_positive(value, "weight").is_err());
        }
    }
}
