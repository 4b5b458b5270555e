//! Timeout utilities for page operations
//!
//! Provides an async timeout wrapper so a hung navigation or script
//! evaluation can't stall a whole batch.

use anyhow::Result;
use std::future::Future;
use std::time::Duration;

/// Helper function to wrap async page operations with explicit timeout
///
/// Returns proper error messages distinguishing between timeout and operation failures.
///
/// # Arguments
/// * `operation` - The async Future to execute with a timeout
/// * `timeout` - Maximum time the operation may take
/// * `operation_name` - Human-readable name for error messages
pub async fn with_page_timeout<F, T>(
    operation: F,
    timeout: Duration,
    operation_name: &str,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    match tokio::time::timeout(timeout, operation).await {
        Ok(result) => result,
        Err(_) => Err(anyhow::anyhow!(
            "{operation_name} timeout after {} ms",
            timeout.as_millis()
        )),
    }
}
