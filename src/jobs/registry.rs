//! Process-wide job registry
//!
//! Provides async-safe job tracking. Each record is written only by its own
//! runner; the map itself is shared with the request handlers and the reaper.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::Instant;

use super::errors::JobError;
use super::types::{JobDownload, JobId, JobRecord, JobSnapshot, JobStatus};

/// Pre-allocated slots; a handful of jobs is the normal load
const JOB_MAP_INITIAL_CAPACITY: usize = 16;

/// Map of job id to job record
#[derive(Debug, Clone)]
pub struct JobRegistry {
    jobs: Arc<Mutex<HashMap<JobId, JobRecord>>>,
}

impl JobRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self {
            jobs: Arc::new(Mutex::new(HashMap::with_capacity(
                JOB_MAP_INITIAL_CAPACITY,
            ))),
        }
    }

    /// Register a fresh `queued` job for `source`
    pub async fn create(&self, source: &str) -> JobId {
        let id = JobId::new();
        let mut jobs = self.jobs.lock().await;
        jobs.insert(id, JobRecord::new(source));
        id
    }

    /// Clone of a job record
    pub async fn get(&self, id: &JobId) -> Option<JobRecord> {
        let jobs = self.jobs.lock().await;
        jobs.get(id).cloned()
    }

    pub async fn snapshot(&self, id: &JobId) -> Option<JobSnapshot> {
        let jobs = self.jobs.lock().await;
        jobs.get(id).map(JobRecord::snapshot)
    }

    /// Remove and return a job record
    pub async fn delete(&self, id: &JobId) -> Option<JobRecord> {
        let mut jobs = self.jobs.lock().await;
        jobs.remove(id)
    }

    pub async fn len(&self) -> usize {
        self.jobs.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.jobs.lock().await.is_empty()
    }

    /// Apply `f` to a live, non-terminal record
    ///
    /// No-op when the record was deleted or has already finished, so an
    /// orphaned runner can keep writing without effect.
    async fn update<F>(&self, id: &JobId, f: F) -> bool
    where
        F: FnOnce(&mut JobRecord),
    {
        let mut jobs = self.jobs.lock().await;
        match jobs.get_mut(id) {
            Some(record) if !record.status.is_terminal() => {
                f(record);
                true
            }
            _ => false,
        }
    }

    /// `queued -> processing`
    pub async fn mark_processing(&self, id: &JobId) -> bool {
        self.update(id, |r| r.status = JobStatus::Processing).await
    }

    /// Raise progress; lower values are ignored
    pub async fn set_progress(&self, id: &JobId, percent: u8) -> bool {
        self.update(id, |r| r.progress = r.progress.max(percent.min(100)))
            .await
    }

    /// `processing -> done`, progress forced to 100
    pub async fn complete(&self, id: &JobId, result: String) -> bool {
        self.update(id, |r| {
            r.status = JobStatus::Done;
            r.progress = 100;
            r.result = Some(result);
            r.error = None;
        })
        .await
    }

    /// `processing -> error`, no result
    pub async fn fail(&self, id: &JobId, error: String) -> bool {
        self.update(id, |r| {
            r.status = JobStatus::Error;
            r.result = None;
            r.error = Some(error);
        })
        .await
    }

    /// Hand out a finished job's result and delete the record
    ///
    /// Check and removal happen under one lock, so concurrent downloads of
    /// the same job get the payload exactly once.
    pub async fn take_result(&self, id: &JobId) -> Result<JobDownload, JobError> {
        let mut jobs = self.jobs.lock().await;
        let record = jobs.get(id).ok_or(JobError::NotFound)?;
        if record.status != JobStatus::Done {
            return Err(JobError::NotReady);
        }

        let record = jobs.remove(id).ok_or(JobError::NotFound)?;
        Ok(JobDownload {
            source: record.source,
            body: record.result.unwrap_or_default(),
        })
    }

    /// Delete every record older than `ttl`, whatever its status
    pub async fn evict_expired(&self, ttl: Duration) -> usize {
        let now = Instant::now();
        let mut jobs = self.jobs.lock().await;
        let initial_count = jobs.len();

        jobs.retain(|id, record| {
            let age = now.saturating_duration_since(record.created_at);
            let keep = age <= ttl;
            if !keep {
                log::debug!(
                    "Evicting job {id}: {} (age: {:?})",
                    record.status,
                    age
                );
            }
            keep
        });

        initial_count - jobs.len()
    }
}

impl Default for JobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn lifecycle_updates_in_place() {
        let registry = JobRegistry::new();
        let id = registry.create("nyse").await;
        assert_eq!(registry.snapshot(&id).await.unwrap().status, JobStatus::Queued);

        assert!(registry.mark_processing(&id).await);
        assert!(registry.set_progress(&id, 40).await);
        assert!(registry.set_progress(&id, 20).await);
        assert_eq!(registry.snapshot(&id).await.unwrap().progress, 40);

        assert!(registry.complete(&id, "AAA".into()).await);
        let record = registry.get(&id).await.unwrap();
        assert_eq!(record.status, JobStatus::Done);
        assert_eq!(record.progress, 100);
        assert_eq!(record.result.as_deref(), Some("AAA"));
        assert!(record.error.is_none());
    }

    #[tokio::test]
    async fn terminal_records_are_frozen() {
        let registry = JobRegistry::new();
        let id = registry.create("nyse").await;
        registry.mark_processing(&id).await;
        registry.fail(&id, "boom".into()).await;

        assert!(!registry.complete(&id, "AAA".into()).await);
        assert!(!registry.set_progress(&id, 90).await);
        let record = registry.get(&id).await.unwrap();
        assert_eq!(record.status, JobStatus::Error);
        assert!(record.result.is_none());
        assert_eq!(record.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn writes_to_deleted_jobs_are_ignored() {
        let registry = JobRegistry::new();
        let id = registry.create("nyse").await;
        assert!(registry.delete(&id).await.is_some());

        assert!(!registry.mark_processing(&id).await);
        assert!(!registry.complete(&id, "AAA".into()).await);
        assert!(registry.get(&id).await.is_none());
    }

    #[tokio::test]
    async fn take_result_consumes_done_jobs_only() {
        let registry = JobRegistry::new();
        let id = registry.create("nasdaq").await;

        assert_eq!(registry.take_result(&id).await, Err(JobError::NotReady));
        registry.mark_processing(&id).await;
        assert_eq!(registry.take_result(&id).await, Err(JobError::NotReady));

        registry.complete(&id, "AAA\nBBB".into()).await;
        let download = registry.take_result(&id).await.unwrap();
        assert_eq!(download.body, "AAA\nBBB");
        assert_eq!(download.file_name(), "nasdaq-tickers.csv");

        assert_eq!(registry.take_result(&id).await, Err(JobError::NotFound));
        assert!(registry.is_empty().await);
    }

    #[tokio::test(start_paused = true)]
    async fn evicts_only_expired_records() {
        let registry = JobRegistry::new();
        let old = registry.create("nyse").await;
        tokio::time::advance(Duration::from_secs(20 * 60)).await;
        let young = registry.create("nyse").await;
        tokio::time::advance(Duration::from_secs(11 * 60)).await;

        let evicted = registry.evict_expired(Duration::from_secs(30 * 60)).await;
        assert_eq!(evicted, 1);
        assert!(registry.get(&old).await.is_none());
        assert!(registry.get(&young).await.is_some());
    }
}
