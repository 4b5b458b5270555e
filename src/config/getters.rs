//! Getter methods for `ScrapeConfig`
//!
//! This module provides all the accessor methods for retrieving configuration
//! values from a `ScrapeConfig` instance.

use std::collections::BTreeMap;
use std::time::Duration;

use super::types::{ScrapeConfig, Source};

impl ScrapeConfig {
    #[must_use]
    pub fn total_items(&self) -> usize {
        self.total_items
    }

    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    #[must_use]
    pub fn batch_delay(&self) -> Duration {
        Duration::from_millis(self.batch_delay_ms)
    }

    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }

    #[must_use]
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    #[must_use]
    pub fn job_ttl(&self) -> Duration {
        Duration::from_secs(self.job_ttl_secs)
    }

    #[must_use]
    pub fn reaper_interval(&self) -> Duration {
        Duration::from_secs(self.reaper_interval_secs)
    }

    #[must_use]
    pub fn link_selector(&self) -> &str {
        &self.link_selector
    }

    #[must_use]
    pub fn sentinel(&self) -> &str {
        &self.sentinel
    }

    #[must_use]
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    #[must_use]
    pub fn headless(&self) -> bool {
        self.headless
    }

    #[must_use]
    pub fn sources(&self) -> &BTreeMap<String, String> {
        &self.sources
    }

    #[must_use]
    pub fn default_source(&self) -> &str {
        &self.default_source
    }

    /// Resolve a client-supplied selector against the catalogue
    ///
    /// Matching is case-insensitive. Unknown or empty selectors resolve to
    /// the default source rather than failing the request.
    #[must_use]
    pub fn resolve_source(&self, selector: &str) -> Source {
        let wanted = selector.trim().to_lowercase();
        let (name, base_url) = self
            .sources
            .get_key_value(&wanted)
            .or_else(|| self.sources.get_key_value(&self.default_source))
            .map(|(name, url)| (name.clone(), url.clone()))
            // build() guarantees the default is present
            .unwrap_or_else(|| (self.default_source.clone(), String::new()));

        Source { name, base_url }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{NASDAQ_SCREENER_URL, NYSE_SCREENER_URL};

    #[test]
    fn resolves_known_sources_case_insensitively() {
        let config = ScrapeConfig::default();
        let source = config.resolve_source("NASDAQ");
        assert_eq!(source.name, "nasdaq");
        assert_eq!(source.base_url, NASDAQ_SCREENER_URL);
    }

    #[test]
    fn unknown_selector_falls_back_to_default() {
        let config = ScrapeConfig::default();
        let source = config.resolve_source("lse");
        assert_eq!(source.name, "nyse");
        assert_eq!(source.base_url, NYSE_SCREENER_URL);

        assert_eq!(config.resolve_source("").name, "nyse");
    }
}
