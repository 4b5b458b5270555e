//! Progress reporting abstraction for scrape runs
//!
//! Defines the `ProgressReporter` trait the batch scheduler reports through
//! and provides a no-op implementation for callers that don't track jobs.

use std::future::Future;

/// Trait for reporting scrape progress at batch boundaries
///
/// Implementations can update a job record, send to a channel, log, etc.
pub trait ProgressReporter: Send + Sync {
    /// Report completion percentage (0-100) after a batch has been merged
    fn report_progress(&self, percent: u8) -> impl Future<Output = ()> + Send;
}

/// Progress reporter that does nothing
#[derive(Debug, Clone, Copy)]
pub struct NoOpProgress;

impl ProgressReporter for NoOpProgress {
    async fn report_progress(&self, _percent: u8) {}
}

/// `round(processed / total * 100)`, clamped to 100
#[must_use]
pub fn progress_percent(processed: usize, total: usize) -> u8 {
    if total == 0 {
        return 100;
    }
    let percent = (processed.min(total) as f64 / total as f64 * 100.0).round();
    percent as u8
}
