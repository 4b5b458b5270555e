//! Request interception for lanes
//!
//! Screener pages pull in charts, logos and web fonts that have nothing to
//! do with the ticker table. Each lane pauses every request through the CDP
//! `Fetch` domain and aborts the heavy resource classes.

use anyhow::{Context, Result};
use chromiumoxide::Page;
use chromiumoxide::cdp::browser_protocol::fetch::{
    ContinueRequestParams, EnableParams, EventRequestPaused, FailRequestParams, RequestPattern,
};
use chromiumoxide::cdp::browser_protocol::network::{ErrorReason, ResourceType};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tracing::trace;

use crate::utils::BLOCKED_RESOURCE_TYPES;

/// Whether requests of this type are aborted
#[must_use]
pub fn is_blocked_resource(resource_type: &ResourceType) -> bool {
    BLOCKED_RESOURCE_TYPES.contains(&resource_type.as_ref())
}

/// Enable interception on `page` and spawn the task answering paused requests
///
/// The listener is registered before `Fetch.enable` so no request slips
/// through unanswered. The returned handle must be aborted when the lane's
/// session is released.
pub async fn install_resource_filter(page: &Page) -> Result<JoinHandle<()>> {
    let mut paused = page
        .event_listener::<EventRequestPaused>()
        .await
        .context("Failed to subscribe to Fetch.requestPaused")?;

    page.execute(
        EnableParams::builder()
            .pattern(RequestPattern::builder().url_pattern("*").build())
            .build(),
    )
    .await
    .context("Failed to enable request interception")?;

    let page = page.clone();
    Ok(tokio::spawn(async move {
        while let Some(event) = paused.next().await {
            let outcome = if is_blocked_resource(&event.resource_type) {
                page.execute(FailRequestParams::new(
                    event.request_id.clone(),
                    ErrorReason::BlockedByClient,
                ))
                .await
                .map(|_| ())
            } else {
                page.execute(ContinueRequestParams::new(event.request_id.clone()))
                    .await
                    .map(|_| ())
            };

            // Fails routinely for requests cancelled by a new navigation
            if let Err(e) = outcome {
                trace!("Could not answer paused request {:?}: {}", event.request_id, e);
            }
        }
        trace!("Request interception stream ended");
    }))
}
