//! Builder for `ScrapeConfig`
//!
//! Every field has a default, so the builder can be used as-is. Validation
//! happens once in `build()` so that jobs never see an unusable config.

use std::collections::BTreeMap;

use super::errors::ConfigError;
use super::types::{ScrapeConfig, default_sources};
use crate::utils::parse_source_url;

/// Upper bound on lanes per job
///
/// Each lane is a browser tab; past this the screener starts answering
/// with captchas.
pub const MAX_CONCURRENCY: usize = 32;

#[derive(Debug, Clone)]
pub struct ScrapeConfigBuilder {
    config: ScrapeConfig,
}

impl Default for ScrapeConfigBuilder {
    fn default() -> Self {
        Self {
            config: ScrapeConfig::default(),
        }
    }
}

impl ScrapeConfig {
    /// Create a builder for configuring a `ScrapeConfig` with a fluent interface
    #[must_use]
    pub fn builder() -> ScrapeConfigBuilder {
        ScrapeConfigBuilder::default()
    }
}

impl ScrapeConfigBuilder {
    #[must_use]
    pub fn total_items(mut self, total: usize) -> Self {
        self.config.total_items = total;
        self
    }

    #[must_use]
    pub fn page_size(mut self, size: usize) -> Self {
        self.config.page_size = size;
        self
    }

    /// Set the number of lanes per job (also the batch size)
    #[must_use]
    pub fn concurrency(mut self, lanes: usize) -> Self {
        self.config.concurrency = lanes;
        self
    }

    #[must_use]
    pub fn batch_delay_ms(mut self, ms: u64) -> Self {
        self.config.batch_delay_ms = ms;
        self
    }

    #[must_use]
    pub fn settle_delay_ms(mut self, ms: u64) -> Self {
        self.config.settle_delay_ms = ms;
        self
    }

    /// Set the per-page timeout
    ///
    /// Covers navigation, settle delay and extraction together. A page that
    /// exceeds it contributes no identifiers but does not fail the job.
    #[must_use]
    pub fn fetch_timeout_secs(mut self, secs: u64) -> Self {
        self.config.fetch_timeout_secs = secs;
        self
    }

    #[must_use]
    pub fn job_ttl_secs(mut self, secs: u64) -> Self {
        self.config.job_ttl_secs = secs;
        self
    }

    #[must_use]
    pub fn reaper_interval_secs(mut self, secs: u64) -> Self {
        self.config.reaper_interval_secs = secs;
        self
    }

    #[must_use]
    pub fn link_selector(mut self, selector: impl Into<String>) -> Self {
        self.config.link_selector = selector.into();
        self
    }

    #[must_use]
    pub fn sentinel(mut self, value: impl Into<String>) -> Self {
        self.config.sentinel = value.into();
        self
    }

    #[must_use]
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.config.user_agent = ua.into();
        self
    }

    /// Set browser headless mode
    ///
    /// Headed mode is only honoured in debug builds, release builds always
    /// run headless.
    #[must_use]
    pub fn headless(mut self, headless: bool) -> Self {
        self.config.headless = headless;
        self
    }

    /// Add or replace one source in the catalogue
    ///
    /// Names are matched case-insensitively, so they are stored lowercase.
    #[must_use]
    pub fn source(mut self, name: impl Into<String>, base_url: impl Into<String>) -> Self {
        self.config
            .sources
            .insert(name.into().trim().to_lowercase(), base_url.into());
        self
    }

    /// Replace the whole source catalogue
    #[must_use]
    pub fn sources(mut self, sources: BTreeMap<String, String>) -> Self {
        self.config.sources = sources
            .into_iter()
            .map(|(name, url)| (name.trim().to_lowercase(), url))
            .collect();
        self
    }

    #[must_use]
    pub fn default_source(mut self, name: impl Into<String>) -> Self {
        self.config.default_source = name.into().trim().to_lowercase();
        self
    }

    pub fn build(self) -> Result<ScrapeConfig, ConfigError> {
        let mut config = self.config;

        if config.page_size == 0 {
            return Err(ConfigError::ZeroPageSize);
        }
        if config.concurrency == 0 || config.concurrency > MAX_CONCURRENCY {
            return Err(ConfigError::Concurrency {
                value: config.concurrency,
                max: MAX_CONCURRENCY,
            });
        }
        if config.fetch_timeout_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "fetch_timeout_secs",
            });
        }
        if config.reaper_interval_secs == 0 {
            return Err(ConfigError::ZeroDuration {
                field: "reaper_interval_secs",
            });
        }

        if config.sources.is_empty() {
            config.sources = default_sources();
        }
        for (name, url) in &config.sources {
            if name.is_empty() {
                return Err(ConfigError::InvalidSource {
                    name: name.clone(),
                    reason: "empty name".to_string(),
                });
            }
            parse_source_url(url).map_err(|e| ConfigError::InvalidSource {
                name: name.clone(),
                reason: format!("{e:#}"),
            })?;
        }
        if !config.sources.contains_key(&config.default_source) {
            return Err(ConfigError::UnknownDefaultSource(config.default_source));
        }

        // Headed mode is a debugging aid only
        #[cfg(not(debug_assertions))]
        if !config.headless {
            tracing::warn!(
                "Forcing headless mode in release build. \
                Headed mode is only available in debug builds for development."
            );
            config.headless = true;
        }

        Ok(config)
    }
}
