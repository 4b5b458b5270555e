//! Job lifecycle API
//!
//! `ScrapeService` is the transport-agnostic front of the engine: it creates
//! jobs, spawns their runners, answers status and download requests, and
//! owns the background tasks (runners and reaper).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{debug, info};

use super::errors::JobError;
use super::reaper::spawn_reaper;
use super::registry::JobRegistry;
use super::runner::run_job;
use super::types::{Health, JobDownload, JobId, JobSnapshot, JobStatus};
use crate::browser_pool::PoolLauncher;
use crate::config::ScrapeConfig;

/// Deletes a synchronous job's record if its caller goes away mid-scrape
struct ForgetOnDrop {
    registry: JobRegistry,
    id: Option<JobId>,
}

impl ForgetOnDrop {
    fn disarm(mut self) -> Option<JobId> {
        self.id.take()
    }
}

impl Drop for ForgetOnDrop {
    fn drop(&mut self) {
        let Some(id) = self.id.take() else { return };
        let Ok(runtime) = tokio::runtime::Handle::try_current() else {
            return;
        };
        let registry = self.registry.clone();
        runtime.spawn(async move {
            if registry.delete(&id).await.is_some() {
                debug!(job_id = %id, "Abandoned synchronous job forgotten");
            }
        });
    }
}

#[derive(Default)]
struct BackgroundTasks {
    reaper: Option<JoinHandle<()>>,
    jobs: JoinSet<()>,
}

/// Job orchestration over a pool launcher
pub struct ScrapeService<L: PoolLauncher> {
    config: Arc<ScrapeConfig>,
    launcher: Arc<L>,
    registry: JobRegistry,
    tasks: Mutex<BackgroundTasks>,
}

impl<L: PoolLauncher> ScrapeService<L> {
    #[must_use]
    pub fn new(config: ScrapeConfig, launcher: L) -> Self {
        Self {
            config: Arc::new(config),
            launcher: Arc::new(launcher),
            registry: JobRegistry::new(),
            tasks: Mutex::new(BackgroundTasks::default()),
        }
    }

    #[must_use]
    pub fn config(&self) -> &ScrapeConfig {
        &self.config
    }

    #[must_use]
    pub fn registry(&self) -> &JobRegistry {
        &self.registry
    }

    fn tasks(&self) -> MutexGuard<'_, BackgroundTasks> {
        self.tasks.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Create a job for `selector` and start its runner
    ///
    /// Returns as soon as the record exists; the scrape runs in the
    /// background. Unknown selectors use the default source.
    pub async fn start(&self, selector: &str) -> JobId {
        let source = self.config.resolve_source(selector);
        let id = self.registry.create(&source.name).await;
        info!(job_id = %id, source = %source.name, "Job queued");

        let registry = self.registry.clone();
        let launcher = Arc::clone(&self.launcher);
        let config = Arc::clone(&self.config);

        let mut tasks = self.tasks();
        // Drop handles of runners that already finished
        while tasks.jobs.try_join_next().is_some() {}
        tasks.jobs.spawn(async move {
            run_job(registry, launcher.as_ref(), &config, id, source).await;
        });
        id
    }

    /// Current status of a job
    pub async fn status(&self, job_id: &str) -> Result<JobSnapshot, JobError> {
        let id: JobId = job_id.parse().map_err(|_| JobError::NotFound)?;
        self.registry.snapshot(&id).await.ok_or(JobError::NotFound)
    }

    /// Hand out a finished job's result and forget the job
    pub async fn download(&self, job_id: &str) -> Result<JobDownload, JobError> {
        let id: JobId = job_id.parse().map_err(|_| JobError::NotFound)?;
        let download = self.registry.take_result(&id).await?;
        info!(job_id = %id, bytes = download.body.len(), "Job downloaded");
        Ok(download)
    }

    /// Run a whole job inline and return its result
    ///
    /// The record is deleted afterwards whatever the outcome, including when
    /// the returned future is dropped before the scrape ends.
    pub async fn scrape_now(&self, selector: &str) -> Result<JobDownload, JobError> {
        let source = self.config.resolve_source(selector);
        let id = self.registry.create(&source.name).await;
        let guard = ForgetOnDrop {
            registry: self.registry.clone(),
            id: Some(id),
        };
        info!(job_id = %id, source = %source.name, "Synchronous scrape started");

        run_job(
            self.registry.clone(),
            self.launcher.as_ref(),
            &self.config,
            id,
            source,
        )
        .await;

        let id = guard.disarm().ok_or(JobError::NotFound)?;
        let record = self.registry.delete(&id).await.ok_or(JobError::NotFound)?;
        match record.status {
            JobStatus::Done => Ok(JobDownload {
                source: record.source,
                body: record.result.unwrap_or_default(),
            }),
            _ => Err(JobError::Failed(
                record
                    .error
                    .unwrap_or_else(|| format!("Job ended in state {}", record.status)),
            )),
        }
    }

    #[must_use]
    pub fn health(&self) -> Health {
        Health {
            ok: true,
            timestamp: chrono::Utc::now(),
        }
    }

    /// Start the reaper (call once at initialization)
    ///
    /// Later calls are no-ops while the reaper is running.
    pub fn start_cleanup_task(&self) {
        let mut tasks = self.tasks();
        if tasks.reaper.as_ref().is_some_and(|h| !h.is_finished()) {
            debug!("Reaper already running");
            return;
        }
        tasks.reaper = Some(spawn_reaper(
            self.registry.clone(),
            self.config.job_ttl(),
            self.config.reaper_interval(),
        ));
        info!(
            ttl_secs = self.config.job_ttl().as_secs(),
            interval_secs = self.config.reaper_interval().as_secs(),
            "Reaper started"
        );
    }

    /// Stop the reaper and abort every running job
    pub async fn shutdown(&self) {
        let (reaper, mut jobs) = {
            let mut tasks = self.tasks();
            (tasks.reaper.take(), std::mem::take(&mut tasks.jobs))
        };

        if let Some(reaper) = reaper {
            reaper.abort();
        }
        if !jobs.is_empty() {
            info!(running = jobs.len(), "Aborting running jobs");
        }
        jobs.shutdown().await;
        info!("Scrape service stopped");
    }
}
