//! Shared configuration constants for the screener scraper
//!
//! This module contains default values and configuration constants used
//! throughout the codebase to ensure consistency and avoid magic numbers.

/// Estimated size of one screener listing
///
/// The screener does not expose an exact count up front, so the plan is
/// derived from this fixed estimate. Pages past the real end simply render
/// an empty table and contribute nothing.
pub const DEFAULT_TOTAL_ITEMS: usize = 1355;

/// Rows per screener page
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Number of browser tabs driven in parallel per job
///
/// 3-5 keeps the screener from throttling us while still finishing a full
/// listing in a couple of minutes.
pub const DEFAULT_CONCURRENCY: usize = 5;

/// Pause between two batches (milliseconds)
pub const DEFAULT_BATCH_DELAY_MS: u64 = 1_000;

/// Time given to client-side rendering after `DOMContentLoaded` (milliseconds)
pub const DEFAULT_SETTLE_DELAY_MS: u64 = 3_000;

/// Upper bound for a single page fetch, navigation and extraction included
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 45;

/// Job records older than this are evicted by the reaper (30 minutes)
pub const DEFAULT_JOB_TTL_SECS: u64 = 30 * 60;

/// Reaper sweep period (10 minutes)
pub const DEFAULT_REAPER_INTERVAL_SECS: u64 = 10 * 60;

/// Source used when a request names an unknown or empty selector
pub const DEFAULT_SOURCE: &str = "nyse";

/// NYSE common stocks, average volume over 300k, price over $5
pub const NYSE_SCREENER_URL: &str =
    "https://finviz.com/screener.ashx?v=111&f=exch_nyse,ind_stocksonly,sh_avgvol_o300,sh_price_o5";

/// NASDAQ common stocks, average volume over 300k, price over $5
pub const NASDAQ_SCREENER_URL: &str =
    "https://finviz.com/screener.ashx?v=111&f=exch_nasd,ind_stocksonly,sh_avgvol_o300,sh_price_o5";

/// Anchors whose text is a ticker symbol
pub const TICKER_LINK_SELECTOR: &str = r#"a[href*="quote.ashx?t="]"#;

/// Country filter link on every screener page; looks exactly like a ticker
pub const SENTINEL_IDENTIFIER: &str = "USA";

/// Resource classes aborted by request interception
pub const BLOCKED_RESOURCE_TYPES: &[&str] = &["Image", "Stylesheet", "Font", "Media"];

/// Chrome user agent string pinned on every lane
///
/// The screener serves a reduced page to headless user agents, so lanes
/// present a regular desktop Chrome instead.
pub const CHROME_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/115 Safari/537.36";

/// Port used by the HTTP server when `PORT` is not set
pub const DEFAULT_PORT: u16 = 3000;
