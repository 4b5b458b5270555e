//! Scrape Engine Module
//!
//! Turns "fetch N pages of a paginated listing" into a bounded-concurrency,
//! batch-ordered run over a lane pool, with per-page fault isolation and
//! progress reporting at batch boundaries.

// Sub-modules
pub mod accumulator;
pub mod errors;
pub mod execution;
pub mod page_timeout;
pub mod planner;
pub mod progress;
pub mod scheduler;

// Re-exports for public API
pub use accumulator::{IdentifierAccumulator, ScrapeOutput};
pub use errors::{ScrapeError, ScrapeResult};
pub use execution::{scrape_listing, scrape_listing_simple};
pub use page_timeout::with_page_timeout;
pub use planner::plan_offsets;
pub use progress::{NoOpProgress, ProgressReporter, progress_percent};
pub use scheduler::{BatchSummary, ScheduleSettings, run_batches};
