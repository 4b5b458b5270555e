//! Job orchestration
//!
//! In-memory job records, their runners, the reaper that expires them and
//! the `ScrapeService` API tying it together.

pub mod errors;
pub mod reaper;
pub mod registry;
pub mod runner;
pub mod service;
pub mod types;

pub use errors::JobError;
pub use reaper::spawn_reaper;
pub use registry::JobRegistry;
pub use runner::{RegistryProgress, run_job};
pub use service::ScrapeService;
pub use types::{Health, JobDownload, JobId, JobRecord, JobSnapshot, JobStatus};
