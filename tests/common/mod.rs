//! Test utilities and helper functions for the screener test suite
//!
//! `FakeLauncher` stands in for headless Chrome: every page offset is
//! scripted to succeed, fail, hang or panic, and the launcher records what
//! the scheduler did with its lanes.

use anyhow::{Result, anyhow};
use kodegen_tools_screener::{LanePool, PageLane, PoolLauncher, ScrapeConfig};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Scripted behaviour of one page
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum PageScript {
    Identifiers(Vec<&'static str>),
    Fail(&'static str),
    Hang,
    Panic,
}

#[allow(dead_code)]
#[derive(Debug, Default)]
pub struct LaunchLog {
    pub acquired: AtomicUsize,
    pub released: AtomicUsize,
    pub in_flight: AtomicUsize,
    pub max_in_flight: AtomicUsize,
    /// `(lane, offset)` in dispatch order
    pub fetches: Mutex<Vec<(usize, usize)>>,
}

#[allow(dead_code)]
impl LaunchLog {
    pub fn fetches(&self) -> Vec<(usize, usize)> {
        self.fetches.lock().unwrap().clone()
    }

    pub fn fetched_offsets(&self) -> Vec<usize> {
        self.fetches().into_iter().map(|(_, offset)| offset).collect()
    }
}

/// Scripted pool launcher
#[allow(dead_code)]
#[derive(Debug, Clone, Default)]
pub struct FakeLauncher {
    pages: Arc<HashMap<usize, PageScript>>,
    launch_error: Option<&'static str>,
    fetch_latency: Duration,
    pub log: Arc<LaunchLog>,
}

#[allow(dead_code)]
impl FakeLauncher {
    /// Pages not listed in `pages` yield no identifiers
    pub fn new(pages: impl IntoIterator<Item = (usize, PageScript)>) -> Self {
        Self {
            pages: Arc::new(pages.into_iter().collect()),
            ..Self::default()
        }
    }

    /// A launcher whose pool never comes up
    pub fn failing(reason: &'static str) -> Self {
        Self {
            launch_error: Some(reason),
            ..Self::default()
        }
    }

    /// Make every fetch take `latency` before answering
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.fetch_latency = latency;
        self
    }
}

impl PoolLauncher for FakeLauncher {
    type Pool = FakePool;

    async fn acquire(&self, _label: &str, lanes: usize) -> Result<FakePool> {
        if let Some(reason) = self.launch_error {
            return Err(anyhow!(reason));
        }
        self.log.acquired.fetch_add(1, Ordering::SeqCst);
        let lanes = (0..lanes)
            .map(|id| FakeLane {
                id,
                pages: Arc::clone(&self.pages),
                latency: self.fetch_latency,
                log: Arc::clone(&self.log),
            })
            .collect();
        Ok(FakePool {
            lanes,
            log: Arc::clone(&self.log),
        })
    }
}

pub struct FakePool {
    lanes: Vec<FakeLane>,
    log: Arc<LaunchLog>,
}

impl LanePool for FakePool {
    type Lane = FakeLane;

    fn lanes(&self) -> &[FakeLane] {
        &self.lanes
    }

    async fn release(self) -> Result<()> {
        self.log.released.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

pub struct FakeLane {
    id: usize,
    pages: Arc<HashMap<usize, PageScript>>,
    latency: Duration,
    log: Arc<LaunchLog>,
}

impl PageLane for FakeLane {
    async fn fetch_identifiers(&self, url: &str) -> Result<HashSet<String>> {
        let offset = offset_of(url);
        self.log.fetches.lock().unwrap().push((self.id, offset));

        let now = self.log.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.log.max_in_flight.fetch_max(now, Ordering::SeqCst);
        tokio::time::sleep(self.latency).await;
        self.log.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.pages.get(&offset) {
            Some(PageScript::Identifiers(ids)) => Ok(ids.iter().map(ToString::to_string).collect()),
            Some(PageScript::Fail(reason)) => Err(anyhow!(*reason)),
            Some(PageScript::Hang) => std::future::pending().await,
            Some(PageScript::Panic) => panic!("scripted lane panic at offset {offset}"),
            None => Ok(HashSet::new()),
        }
    }
}

/// Row offset encoded in a page URL (`1` for the bare base URL)
pub fn offset_of(url: &str) -> usize {
    url::Url::parse(url)
        .ok()
        .and_then(|u| {
            u.query_pairs()
                .find(|(k, _)| k == "r")
                .and_then(|(_, v)| v.parse().ok())
        })
        .unwrap_or(1)
}

/// Small, fast config: `total` rows, `page_size` per page, `lanes` lanes
#[allow(dead_code)]
pub fn test_config(total: usize, page_size: usize, lanes: usize) -> ScrapeConfig {
    ScrapeConfig::builder()
        .total_items(total)
        .page_size(page_size)
        .concurrency(lanes)
        .batch_delay_ms(1000)
        .settle_delay_ms(0)
        .fetch_timeout_secs(45)
        .build()
        .expect("test config is valid")
}

/// Poll until the job leaves `queued` / `processing`
#[allow(dead_code)]
pub async fn wait_for_terminal<L: PoolLauncher>(
    service: &kodegen_tools_screener::ScrapeService<L>,
    job_id: &str,
) -> kodegen_tools_screener::JobSnapshot {
    loop {
        let snapshot = service.status(job_id).await.expect("job exists");
        if matches!(
            snapshot.status,
            kodegen_tools_screener::JobStatus::Done | kodegen_tools_screener::JobStatus::Error
        ) {
            return snapshot;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
