//! Chrome profile directory management
//!
//! Every rendering session gets its own UUID-named profile directory, so
//! concurrent jobs never contend for Chrome's `SingletonLock`.

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Prefix of every profile directory created by this crate
pub const PROFILE_PREFIX: &str = "kodegen_screener_chrome";

/// RAII wrapper for Chrome profile directory
///
/// Removes the directory on drop. Drop it only after the browser process
/// has exited, otherwise Chrome may still hold files open.
#[derive(Debug)]
pub struct BrowserProfile {
    path: PathBuf,
}

impl BrowserProfile {
    /// Get reference to the profile directory path
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for BrowserProfile {
    fn drop(&mut self) {
        if self.path.exists() {
            debug!("BrowserProfile cleanup: removing {}", self.path.display());
            if let Err(e) = std::fs::remove_dir_all(&self.path) {
                warn!(
                    "Failed to cleanup profile directory {}: {}",
                    self.path.display(),
                    e
                );
            }
        }
    }
}

/// Create a unique Chrome profile directory in the system temp dir
///
/// `label` distinguishes sessions in the directory name (usually the job id).
pub fn create_unique_profile(label: &str) -> Result<BrowserProfile> {
    let path = std::env::temp_dir().join(format!("{PROFILE_PREFIX}_{label}_{}", Uuid::new_v4()));

    // create_dir (not create_dir_all) fails on collision
    std::fs::create_dir(&path)
        .with_context(|| format!("Failed to create profile directory: {}", path.display()))?;

    info!("Created Chrome profile directory: {}", path.display());
    Ok(BrowserProfile { path })
}
