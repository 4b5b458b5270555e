//! Periodic eviction of stale job records

use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

use super::registry::JobRegistry;

/// Spawn the sweep loop
///
/// The first sweep runs one `period` after start. Every sweep deletes the
/// records older than `ttl` regardless of status; runners of evicted jobs
/// keep going and their writes become no-ops.
pub fn spawn_reaper(registry: JobRegistry, ttl: Duration, period: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = interval_at(Instant::now() + period, period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let evicted = registry.evict_expired(ttl).await;
            if evicted > 0 {
                tracing::info!(evicted, "Reaper removed expired jobs");
            } else {
                tracing::trace!("Reaper sweep found nothing to evict");
            }
        }
    })
}
