//! Core configuration types for screener scraping
//!
//! This module contains the main `ScrapeConfig` struct and its associated types
//! that define the configuration parameters for scrape jobs.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::utils::{
    CHROME_USER_AGENT, DEFAULT_BATCH_DELAY_MS, DEFAULT_CONCURRENCY, DEFAULT_FETCH_TIMEOUT_SECS,
    DEFAULT_JOB_TTL_SECS, DEFAULT_PAGE_SIZE, DEFAULT_REAPER_INTERVAL_SECS,
    DEFAULT_SETTLE_DELAY_MS, DEFAULT_SOURCE, DEFAULT_TOTAL_ITEMS, NASDAQ_SCREENER_URL,
    NYSE_SCREENER_URL, SENTINEL_IDENTIFIER, TICKER_LINK_SELECTOR,
};

/// Main configuration struct for scrape jobs
///
/// Fixed at process start. Every job started by a `ScrapeService` reads
/// the same values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeConfig {
    /// Estimated number of rows in a listing. Drives the offset plan.
    pub(crate) total_items: usize,

    /// Rows per page. Always > 0 (validated in builder).
    pub(crate) page_size: usize,

    /// Lanes per job, which is also the batch size
    pub(crate) concurrency: usize,

    /// Fixed pause between batches
    pub(crate) batch_delay_ms: u64,

    /// Wait after navigation so client-side rendering can fill the table
    pub(crate) settle_delay_ms: u64,

    /// Timeout for one page fetch
    ///
    /// A fetch exceeding it is treated like any other per-page failure.
    pub(crate) fetch_timeout_secs: u64,

    /// Maximum age of a job record before the reaper removes it
    pub(crate) job_ttl_secs: u64,

    /// Period of the reaper sweep
    pub(crate) reaper_interval_secs: u64,

    /// CSS selector of the anchors holding identifiers
    pub(crate) link_selector: String,

    /// Value dropped from every result
    pub(crate) sentinel: String,

    /// User agent pinned on every lane
    pub(crate) user_agent: String,

    pub(crate) headless: bool,

    /// Selector name -> screener base URL
    pub(crate) sources: BTreeMap<String, String>,

    /// Source used for unknown selectors. Always a key of `sources`.
    pub(crate) default_source: String,
}

impl Default for ScrapeConfig {
    fn default() -> Self {
        Self {
            total_items: DEFAULT_TOTAL_ITEMS,
            page_size: DEFAULT_PAGE_SIZE,
            concurrency: DEFAULT_CONCURRENCY,
            batch_delay_ms: DEFAULT_BATCH_DELAY_MS,
            settle_delay_ms: DEFAULT_SETTLE_DELAY_MS,
            fetch_timeout_secs: DEFAULT_FETCH_TIMEOUT_SECS,
            job_ttl_secs: DEFAULT_JOB_TTL_SECS,
            reaper_interval_secs: DEFAULT_REAPER_INTERVAL_SECS,
            link_selector: TICKER_LINK_SELECTOR.to_string(),
            sentinel: SENTINEL_IDENTIFIER.to_string(),
            user_agent: CHROME_USER_AGENT.to_string(),
            headless: true,
            sources: default_sources(),
            default_source: DEFAULT_SOURCE.to_string(),
        }
    }
}

pub(crate) fn default_sources() -> BTreeMap<String, String> {
    let mut sources = BTreeMap::new();
    sources.insert("nyse".to_string(), NYSE_SCREENER_URL.to_string());
    sources.insert("nasdaq".to_string(), NASDAQ_SCREENER_URL.to_string());
    sources
}

/// A resolved source selector
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Source {
    /// Catalogue name (e.g. `nyse`)
    pub name: String,
    /// Base URL of the first page
    pub base_url: String,
}
