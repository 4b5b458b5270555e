//! End-to-end scrape of one listing
//!
//! Acquires a lane pool, runs the offset plan through the batch scheduler,
//! releases the pool and finalizes the identifier set.

use log::{error, info, warn};

use super::accumulator::ScrapeOutput;
use super::errors::{ScrapeError, ScrapeResult};
use super::planner::plan_offsets;
use super::progress::{NoOpProgress, ProgressReporter};
use super::scheduler::{ScheduleSettings, run_batches};
use crate::browser_pool::{LanePool, PoolLauncher};
use crate::config::{ScrapeConfig, Source};

/// Scrape `source` and report batch progress through `progress`
///
/// Pool creation failure is fatal. Page failures are absorbed, so a run
/// where every page failed still succeeds with an empty output. Pool
/// teardown failures are logged and never fail the run.
pub async fn scrape_listing<L, R>(
    launcher: &L,
    config: &ScrapeConfig,
    source: &Source,
    progress: &R,
    label: &str,
) -> ScrapeResult<ScrapeOutput>
where
    L: PoolLauncher,
    R: ProgressReporter,
{
    let offsets = plan_offsets(config.total_items(), config.page_size());
    info!(
        "[{label}] Scraping {} ({} pages from {})",
        source.name,
        offsets.len(),
        source.base_url
    );

    let pool = launcher
        .acquire(label, config.concurrency())
        .await
        .map_err(|e| {
            error!("[{label}] Lane pool launch failed: {e:#}");
            ScrapeError::PoolLaunch(format!("{e:#}"))
        })?;

    let settings = ScheduleSettings::from(config);
    let outcome = run_batches(
        pool.lanes(),
        &source.base_url,
        &offsets,
        &settings,
        progress,
        label,
    )
    .await;

    if let Err(e) = pool.release().await {
        warn!("[{label}] Lane pool teardown failed: {e:#}");
    }

    let summary = outcome?;
    let output = summary.accumulator.finalize();
    info!(
        "[{label}] Done: {} identifiers ({} pages ok, {} failed)",
        output.len(),
        summary.pages_fetched,
        summary.pages_failed
    );
    Ok(output)
}

/// Scrape without progress tracking
pub async fn scrape_listing_simple<L: PoolLauncher>(
    launcher: &L,
    config: &ScrapeConfig,
    source: &Source,
    label: &str,
) -> ScrapeResult<ScrapeOutput> {
    scrape_listing(launcher, config, source, &NoOpProgress, label).await
}
