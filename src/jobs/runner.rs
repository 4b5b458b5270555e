//! Job runner
//!
//! Runs one job's scrape and writes every state transition back into the
//! registry. Nothing escapes: scrape errors and panics both end up as the
//! job's error description.

use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use tracing::{debug, error, info};

use super::registry::JobRegistry;
use super::types::JobId;
use crate::browser_pool::PoolLauncher;
use crate::config::{ScrapeConfig, Source};
use crate::scrape_engine::{ProgressReporter, ScrapeError, scrape_listing};

/// Forwards batch progress into the job record
#[derive(Debug, Clone)]
pub struct RegistryProgress {
    registry: JobRegistry,
    id: JobId,
}

impl RegistryProgress {
    #[must_use]
    pub fn new(registry: JobRegistry, id: JobId) -> Self {
        Self { registry, id }
    }
}

impl ProgressReporter for RegistryProgress {
    async fn report_progress(&self, percent: u8) {
        self.registry.set_progress(&self.id, percent).await;
    }
}

/// Drive job `id` from `queued` to `done` or `error`
pub async fn run_job<L: PoolLauncher>(
    registry: JobRegistry,
    launcher: &L,
    config: &ScrapeConfig,
    id: JobId,
    source: Source,
) {
    registry.mark_processing(&id).await;
    let label = id.to_string();
    let progress = RegistryProgress::new(registry.clone(), id);

    let outcome = AssertUnwindSafe(scrape_listing(launcher, config, &source, &progress, &label))
        .catch_unwind()
        .await
        .unwrap_or_else(|payload| Err(ScrapeError::Panicked(panic_message(&*payload))));

    match outcome {
        Ok(output) => {
            info!(job_id = %id, identifiers = output.len(), "Job done");
            if !registry.complete(&id, output.to_text()).await {
                debug!(job_id = %id, "Job record gone before completion; result dropped");
            }
        }
        Err(e) => {
            error!(job_id = %id, "Job failed: {e}");
            registry.fail(&id, e.to_string()).await;
        }
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
