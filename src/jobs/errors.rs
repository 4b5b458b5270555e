//! Client protocol errors of the job API

use thiserror::Error;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum JobError {
    /// Unknown, expired or already downloaded
    #[error("Job not found")]
    NotFound,

    /// Download requested before the job reached `done`
    #[error("Job not completed")]
    NotReady,

    /// Synchronous scrape ended in `error`
    #[error("{0}")]
    Failed(String),
}
