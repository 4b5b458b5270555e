//! Environment loading for `ScrapeConfig`
//!
//! The server reads its configuration once at startup. Every knob has a
//! `SCREENER_*` variable; unset variables keep the builder default.

use std::str::FromStr;

use super::builder::ScrapeConfigBuilder;
use super::errors::ConfigError;
use super::types::ScrapeConfig;

/// Read and parse one variable, `Ok(None)` when unset or empty
fn env_var<T: FromStr>(var: &'static str) -> Result<Option<T>, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Ok(None),
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidEnv { var, value }),
        Err(_) => Ok(None),
    }
}

impl ScrapeConfig {
    /// Build a config from `SCREENER_*` environment variables
    ///
    /// | Variable | Meaning |
    /// |---|---|
    /// | `SCREENER_TOTAL_ITEMS` | listing size estimate |
    /// | `SCREENER_PAGE_SIZE` | rows per page |
    /// | `SCREENER_CONCURRENCY` | lanes per job |
    /// | `SCREENER_BATCH_DELAY_MS` | pause between batches |
    /// | `SCREENER_SETTLE_DELAY_MS` | render wait per page |
    /// | `SCREENER_FETCH_TIMEOUT_SECS` | per-page timeout |
    /// | `SCREENER_JOB_TTL_SECS` | job record lifetime |
    /// | `SCREENER_REAPER_INTERVAL_SECS` | sweep period |
    /// | `SCREENER_HEADLESS` | `true` / `false` |
    /// | `SCREENER_USER_AGENT` | pinned user agent |
    /// | `SCREENER_DEFAULT_SOURCE` | fallback selector |
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::builder().apply_env()?.build()
    }
}

impl ScrapeConfigBuilder {
    /// Overlay environment variables on top of the current builder values
    pub fn apply_env(mut self) -> Result<Self, ConfigError> {
        if let Some(v) = env_var("SCREENER_TOTAL_ITEMS")? {
            self = self.total_items(v);
        }
        if let Some(v) = env_var("SCREENER_PAGE_SIZE")? {
            self = self.page_size(v);
        }
        if let Some(v) = env_var("SCREENER_CONCURRENCY")? {
            self = self.concurrency(v);
        }
        if let Some(v) = env_var("SCREENER_BATCH_DELAY_MS")? {
            self = self.batch_delay_ms(v);
        }
        if let Some(v) = env_var("SCREENER_SETTLE_DELAY_MS")? {
            self = self.settle_delay_ms(v);
        }
        if let Some(v) = env_var("SCREENER_FETCH_TIMEOUT_SECS")? {
            self = self.fetch_timeout_secs(v);
        }
        if let Some(v) = env_var("SCREENER_JOB_TTL_SECS")? {
            self = self.job_ttl_secs(v);
        }
        if let Some(v) = env_var("SCREENER_REAPER_INTERVAL_SECS")? {
            self = self.reaper_interval_secs(v);
        }
        if let Some(v) = env_var("SCREENER_HEADLESS")? {
            self = self.headless(v);
        }
        if let Some(v) = env_var::<String>("SCREENER_USER_AGENT")? {
            self = self.user_agent(v);
        }
        if let Some(v) = env_var::<String>("SCREENER_DEFAULT_SOURCE")? {
            self = self.default_source(v);
        }
        Ok(self)
    }
}
