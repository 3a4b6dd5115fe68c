use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use metrics_util::debugging::DebuggingRecorder;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use misura::application::repos::{RepoError, SubjectsRepo};
use misura::application::subjects::SubjectService;
use misura::cache::{ListCache, list_key};
use misura::domain::entities::{NewSubject, SubjectRecord};
use misura::domain::filter::SubjectFilter;

#[derive(Default)]
struct MemoryStore {
    subjects: Mutex<Vec<SubjectRecord>>,
}

#[async_trait]
impl SubjectsRepo for MemoryStore {
    async fn create_subject(&self, subject: NewSubject) -> Result<SubjectRecord, RepoError> {
        let mut subjects = self.subjects.lock().await;
        let record = SubjectRecord {
            id: subjects.len() as i64 + 1,
            length: subject.length,
            weight: subject.weight,
            is_active: true,
            create_at: OffsetDateTime::now_utc(),
            delete_at: None,
        };
        subjects.push(record.clone());
        Ok(record)
    }

    async fn find_subject(&self, id: i64) -> Result<Option<SubjectRecord>, RepoError> {
        Ok(self
            .subjects
            .lock()
            .await
            .iter()
            .find(|subject| subject.id == id)
            .cloned())
    }

    async fn soft_delete_subject(&self, _id: i64) -> Result<SubjectRecord, RepoError> {
        Err(RepoError::NotFound)
    }

    async fn list_subjects(
        &self,
        _filter: &SubjectFilter,
    ) -> Result<Vec<SubjectRecord>, RepoError> {
        Ok(self.subjects.lock().await.clone())
    }
}

#[derive(Default)]
struct MemoryListCache {
    entries: Mutex<HashMap<String, Vec<SubjectRecord>>>,
}

#[async_trait]
impl ListCache for MemoryListCache {
    async fn get_list(&self, filter: &SubjectFilter) -> Option<Vec<SubjectRecord>> {
        self.entries.lock().await.get(&list_key(filter)).cloned()
    }

    async fn put_list(&self, filter: &SubjectFilter, subjects: &[SubjectRecord]) {
        self.entries
            .lock()
            .await
            .insert(list_key(filter), subjects.to_vec());
    }

    async fn invalidate_lists(&self) {
        self.entries.lock().await.clear();
    }
}

#[tokio::test]
async fn cache_paths_emit_expected_metric_keys() {
    let recorder = DebuggingRecorder::new();
    let snapshotter = recorder.snapshotter();
    recorder
        .install()
        .expect("debug metrics recorder should install in this test process");

    let service = SubjectService::new(Arc::new(MemoryStore::default()))
        .with_list_cache(Some(Arc::new(MemoryListCache::default())));

    // Invalidation sweep on create.
    service
        .create(NewSubject {
            length: 21.5,
            weight: 11.2,
        })
        .await
        .expect("create should succeed");

    // Miss + store, then a hit on the repeat.
    let filter = SubjectFilter::default();
    let outcome = service.list(&filter).await.expect("list should succeed");
    assert!(!outcome.cache_hit);
    let outcome = service.list(&filter).await.expect("list should succeed");
    assert!(outcome.cache_hit);

    let names: HashSet<String> = snapshotter
        .snapshot()
        .into_vec()
        .into_iter()
        .map(|(composite_key, _, _, _)| composite_key.key().name().to_string())
        .collect();

    let expected = [
        "misura_cache_hit_total",
        "misura_cache_miss_total",
        "misura_cache_store_total",
        "misura_cache_invalidate_total",
    ];

    for metric in expected {
        assert!(names.contains(metric), "missing metric: {metric}");
    }
}
