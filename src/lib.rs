pub mod browser_pool;
pub mod browser_profile;
pub mod browser_setup;
pub mod config;
pub mod jobs;
pub mod page_extractor;
pub mod scrape_engine;
pub mod server;
pub mod utils;

pub use browser_pool::{ChromiumLauncher, LanePool, PageLane, PoolLauncher};
pub use browser_setup::{download_managed_browser, find_browser_executable, launch_browser};
pub use config::{ConfigError, ScrapeConfig, Source};
pub use jobs::{JobDownload, JobError, JobId, JobRegistry, JobSnapshot, JobStatus, ScrapeService};
pub use scrape_engine::{
    IdentifierAccumulator, ProgressReporter, ScrapeError, ScrapeOutput, ScrapeResult,
    plan_offsets, scrape_listing,
};
pub use server::router;

/// Scrape `selector` once with a headless Chrome pool
///
/// Convenience for one-off runs outside the job API.
pub async fn scrape(config: &ScrapeConfig, selector: &str) -> ScrapeResult<ScrapeOutput> {
    let launcher = ChromiumLauncher::from_config(config);
    let source = config.resolve_source(selector);
    scrape_engine::scrape_listing_simple(&launcher, config, &source, &source.name).await
}
