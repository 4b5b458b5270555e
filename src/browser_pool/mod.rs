//! Fixed-size lane pools for page fetching
//!
//! A job acquires one pool at start and releases it when its last batch is
//! done. Every lane of a pool shares the same rendering session, so lanes
//! are never torn down individually.
//!
//! The traits keep the scrape engine independent of the browser: the
//! production implementation drives headless Chrome (`ChromiumLauncher`),
//! tests plug in scripted lanes.

use anyhow::Result;
use std::collections::HashSet;
use std::future::Future;

pub mod chromium;
pub mod interception;

pub use chromium::{ChromiumLane, ChromiumLauncher, ChromiumPool, LaneSettings};
pub use interception::{install_resource_filter, is_blocked_resource};

/// One concurrently usable fetch context
///
/// A lane runs one fetch at a time. The scheduler never hands the same lane
/// two offsets of one batch.
pub trait PageLane: Send + Sync {
    /// Render `url` and return the identifiers found on it
    fn fetch_identifiers(&self, url: &str)
    -> impl Future<Output = Result<HashSet<String>>> + Send;
}

/// A set of lanes bound to one rendering session
pub trait LanePool: Send {
    type Lane: PageLane;

    /// All lanes, in the order used for offset assignment
    fn lanes(&self) -> &[Self::Lane];

    /// Tear down the session together with every lane
    fn release(self) -> impl Future<Output = Result<()>> + Send;
}

/// Creates lane pools, one per job
pub trait PoolLauncher: Send + Sync + 'static {
    type Pool: LanePool;

    /// Start a rendering session with `lanes` configured lanes
    ///
    /// `label` names the session in logs and on disk (the job id). Errors
    /// here are fatal for the job that asked.
    fn acquire(&self, label: &str, lanes: usize)
    -> impl Future<Output = Result<Self::Pool>> + Send;
}
