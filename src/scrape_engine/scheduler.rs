//! Batch scheduler
//!
//! Drives the offset plan through a lane pool in strictly sequential batches.
//! Inside a batch every offset gets its own lane and all fetches run
//! concurrently; the next batch starts only after the whole batch has
//! settled and been merged.

use futures::future::join_all;
use log::{debug, info, warn};
use std::time::Duration;

use super::accumulator::IdentifierAccumulator;
use super::errors::{ScrapeError, ScrapeResult};
use super::page_timeout::with_page_timeout;
use super::progress::{ProgressReporter, progress_percent};
use crate::browser_pool::PageLane;
use crate::config::ScrapeConfig;
use crate::utils::page_url;

/// Pacing knobs for one scheduler run
#[derive(Debug, Clone)]
pub struct ScheduleSettings {
    /// Offsets per batch; capped at the pool size
    pub batch_size: usize,
    /// Pause between consecutive batches
    pub batch_delay: Duration,
    /// Upper bound for a single page fetch
    pub fetch_timeout: Duration,
    /// Identifier never admitted into the result
    pub sentinel: String,
}

impl From<&ScrapeConfig> for ScheduleSettings {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            batch_size: config.concurrency(),
            batch_delay: config.batch_delay(),
            fetch_timeout: config.fetch_timeout(),
            sentinel: config.sentinel().to_string(),
        }
    }
}

/// What a scheduler run produced
#[derive(Debug)]
pub struct BatchSummary {
    pub accumulator: IdentifierAccumulator,
    pub pages_fetched: usize,
    pub pages_failed: usize,
}

/// Fetch every offset of `offsets` through `lanes` and merge the results
///
/// Page failures and timeouts contribute nothing and are only logged.
/// Progress is reported after each merged batch. The only error is an
/// empty lane set.
pub async fn run_batches<L, R>(
    lanes: &[L],
    base_url: &str,
    offsets: &[usize],
    settings: &ScheduleSettings,
    progress: &R,
    label: &str,
) -> ScrapeResult<BatchSummary>
where
    L: PageLane,
    R: ProgressReporter,
{
    if lanes.is_empty() {
        return Err(ScrapeError::NoLanes);
    }

    let batch_size = settings.batch_size.clamp(1, lanes.len());
    let batch_count = offsets.len().div_ceil(batch_size);
    let mut summary = BatchSummary {
        accumulator: IdentifierAccumulator::new(settings.sentinel.as_str()),
        pages_fetched: 0,
        pages_failed: 0,
    };
    let mut processed = 0usize;
    let mut last_percent = 0u8;

    for (batch_index, batch) in offsets.chunks(batch_size).enumerate() {
        info!(
            "[{label}] Batch {}/{batch_count}: offsets {batch:?}",
            batch_index + 1
        );

        let fetches = batch.iter().enumerate().map(|(i, &offset)| {
            let lane = &lanes[(processed + i) % lanes.len()];
            let url = page_url(base_url, offset);
            async move {
                let result = with_page_timeout(
                    lane.fetch_identifiers(&url),
                    settings.fetch_timeout,
                    "Page fetch",
                )
                .await;
                (offset, result)
            }
        });

        for (offset, result) in join_all(fetches).await {
            match result {
                Ok(identifiers) => {
                    debug!(
                        "[{label}] Offset {offset}: {} identifiers",
                        identifiers.len()
                    );
                    summary.pages_fetched += 1;
                    summary.accumulator.merge(identifiers);
                }
                Err(e) => {
                    warn!("[{label}] Offset {offset} failed: {e:#}");
                    summary.pages_failed += 1;
                }
            }
        }

        processed += batch.len();
        let percent = progress_percent(processed, offsets.len()).max(last_percent);
        last_percent = percent;
        progress.report_progress(percent).await;
        info!(
            "[{label}] Accumulated {} identifiers ({percent}%)",
            summary.accumulator.len()
        );

        if batch_index + 1 < batch_count && !settings.batch_delay.is_zero() {
            tokio::time::sleep(settings.batch_delay).await;
        }
    }

    Ok(summary)
}
