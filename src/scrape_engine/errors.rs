//! Job-level scrape failures
//!
//! Per-page failures never show up here; the scheduler absorbs them. These
//! are the faults that end a job in the `error` state.

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ScrapeError {
    /// The lane pool could not be created
    #[error("Failed to launch lane pool: {0}")]
    PoolLaunch(String),

    /// The pool came up without any usable lane
    #[error("Lane pool has no lanes")]
    NoLanes,

    /// The job body panicked
    #[error("Scrape task panicked: {0}")]
    Panicked(String),

    #[error("Scrape failed: {0}")]
    Other(String),
}

impl From<anyhow::Error> for ScrapeError {
    fn from(err: anyhow::Error) -> Self {
        // Use {:#} to preserve full error chain with context
        Self::Other(format!("{err:#}"))
    }
}

/// Convenience alias for Result with `ScrapeError`
pub type ScrapeResult<T> = Result<T, ScrapeError>;
