//! Configuration module for scrape jobs
//!
//! This module provides the `ScrapeConfig` struct and its builder for
//! configuring scrape jobs with validation and sensible defaults.

// Sub-modules
pub mod builder;
pub mod errors;
pub mod getters;
pub mod methods;
pub mod types;

// Re-exports for public API
pub use builder::{MAX_CONCURRENCY, ScrapeConfigBuilder};
pub use errors::ConfigError;
pub use types::{ScrapeConfig, Source};
