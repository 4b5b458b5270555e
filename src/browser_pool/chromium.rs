//! Headless Chrome lane pool
//!
//! One job gets one Chrome process; each lane is a tab in it. Tabs are
//! configured once (pinned user agent, resource filter) and then reused for
//! every offset the scheduler assigns them.

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::browser::Browser;
use chromiumoxide::cdp::browser_protocol::network::SetUserAgentOverrideParams;
use std::collections::HashSet;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::interception::install_resource_filter;
use super::{LanePool, PageLane, PoolLauncher};
use crate::browser_profile::{BrowserProfile, create_unique_profile};
use crate::browser_setup::launch_browser;
use crate::config::ScrapeConfig;
use crate::page_extractor::extract_page_identifiers;

/// Per-lane settings derived from `ScrapeConfig`
#[derive(Debug, Clone)]
pub struct LaneSettings {
    pub headless: bool,
    pub user_agent: String,
    pub settle_delay: Duration,
    pub link_selector: String,
    pub sentinel: String,
}

impl From<&ScrapeConfig> for LaneSettings {
    fn from(config: &ScrapeConfig) -> Self {
        Self {
            headless: config.headless(),
            user_agent: config.user_agent().to_string(),
            settle_delay: config.settle_delay(),
            link_selector: config.link_selector().to_string(),
            sentinel: config.sentinel().to_string(),
        }
    }
}

// =============================================================================
// Launcher
// =============================================================================

/// Launches one headless Chrome per acquired pool
#[derive(Debug, Clone)]
pub struct ChromiumLauncher {
    settings: LaneSettings,
}

impl ChromiumLauncher {
    #[must_use]
    pub fn new(settings: LaneSettings) -> Self {
        Self { settings }
    }

    #[must_use]
    pub fn from_config(config: &ScrapeConfig) -> Self {
        Self::new(LaneSettings::from(config))
    }
}

impl PoolLauncher for ChromiumLauncher {
    type Pool = ChromiumPool;

    async fn acquire(&self, label: &str, lanes: usize) -> Result<ChromiumPool> {
        let profile = create_unique_profile(label)
            .context("Failed to create Chrome profile for lane pool")?;

        let (browser, handler) = launch_browser(
            self.settings.headless,
            &self.settings.user_agent,
            profile.path(),
        )
        .await
        .context("Failed to launch browser for lane pool")?;

        let mut pool = ChromiumPool {
            browser,
            handler,
            lanes: Vec::with_capacity(lanes),
            profile: Some(profile),
        };

        let opened = open_lanes(&pool.browser, lanes, &self.settings).await;
        match opened {
            Ok(opened) => {
                pool.lanes = opened;
                info!("[{label}] Lane pool ready with {lanes} lanes");
                Ok(pool)
            }
            Err(e) => {
                // Don't leak the Chrome process when a tab fails to come up
                if let Err(close_err) = pool.release().await {
                    warn!("[{label}] Failed to release half-built lane pool: {close_err:#}");
                }
                Err(e)
            }
        }
    }
}

async fn open_lanes(
    browser: &Browser,
    count: usize,
    settings: &LaneSettings,
) -> Result<Vec<ChromiumLane>> {
    let mut lanes = Vec::with_capacity(count);
    for id in 0..count {
        let page = browser
            .new_page("about:blank")
            .await
            .with_context(|| format!("Failed to open tab for lane {id}"))?;

        let lane = ChromiumLane::configure(id, page, settings)
            .await
            .with_context(|| format!("Failed to configure lane {id}"))?;
        lanes.push(lane);
    }
    Ok(lanes)
}

// =============================================================================
// Pool
// =============================================================================

/// A Chrome process and its configured tabs
pub struct ChromiumPool {
    browser: Browser,
    handler: JoinHandle<()>,
    lanes: Vec<ChromiumLane>,
    /// Removed after the browser exits
    profile: Option<BrowserProfile>,
}

impl LanePool for ChromiumPool {
    type Lane = ChromiumLane;

    fn lanes(&self) -> &[ChromiumLane] {
        &self.lanes
    }

    async fn release(mut self) -> Result<()> {
        let mut errors = Vec::new();

        for lane in self.lanes.drain(..) {
            lane.interceptor.abort();
        }

        debug!("Closing browser");
        if let Err(e) = self.browser.close().await {
            errors.push(format!("Browser close failed: {e}"));
        }

        // Wait for the process to exit before removing its profile
        if let Err(e) = self.browser.wait().await {
            errors.push(format!("Browser wait failed: {e}"));
        }

        self.handler.abort();
        drop(self.profile.take());

        if errors.is_empty() {
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Lane pool teardown incomplete: {}",
                errors.join("; ")
            ))
        }
    }
}

impl Drop for ChromiumPool {
    fn drop(&mut self) {
        // release() already did this on the normal path
        for lane in &self.lanes {
            lane.interceptor.abort();
        }
        self.handler.abort();
    }
}

// =============================================================================
// Lane
// =============================================================================

/// One Chrome tab
#[derive(Debug)]
pub struct ChromiumLane {
    id: usize,
    page: Page,
    interceptor: JoinHandle<()>,
    settle_delay: Duration,
    link_selector: String,
    sentinel: String,
}

impl ChromiumLane {
    async fn configure(id: usize, page: Page, settings: &LaneSettings) -> Result<Self> {
        page.execute(SetUserAgentOverrideParams::new(settings.user_agent.clone()))
            .await
            .context("Failed to pin user agent")?;

        let interceptor = install_resource_filter(&page).await?;

        debug!("Lane {id} configured");
        Ok(Self {
            id,
            page,
            interceptor,
            settle_delay: settings.settle_delay,
            link_selector: settings.link_selector.clone(),
            sentinel: settings.sentinel.clone(),
        })
    }
}

impl PageLane for ChromiumLane {
    async fn fetch_identifiers(&self, url: &str) -> Result<HashSet<String>> {
        self.page
            .goto(url)
            .await
            .with_context(|| format!("Navigation failed on lane {}", self.id))?;

        // The table is filled in after DOMContentLoaded
        tokio::time::sleep(self.settle_delay).await;

        extract_page_identifiers(&self.page, &self.link_selector, &self.sentinel).await
    }
}
