//! Job records and their client-facing views

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokio::time::Instant;
use uuid::Uuid;

/// Opaque job identifier (UUID v4)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(Uuid);

impl JobId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for JobId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for JobId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Lifecycle state of a job
///
/// `Done` and `Error` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Created, runner not yet started
    Queued,
    /// Runner is working through the batches
    Processing,
    /// Result available for download
    Done,
    /// Failed; see the error description
    Error,
}

impl JobStatus {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Done | Self::Error)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Done => "done",
            Self::Error => "error",
        };
        f.write_str(s)
    }
}

/// One job tracked in memory
///
/// `result` is only set in `Done`, `error` only in `Error`.
#[derive(Debug, Clone)]
pub struct JobRecord {
    /// Resolved source name (e.g. `nyse`)
    pub source: String,
    pub status: JobStatus,
    /// Percent complete, never decreases
    pub progress: u8,
    /// Newline-joined identifiers
    pub result: Option<String>,
    pub error: Option<String>,
    /// Only used for expiry
    pub created_at: Instant,
}

impl JobRecord {
    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            status: JobStatus::Queued,
            progress: 0,
            result: None,
            error: None,
            created_at: Instant::now(),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> JobSnapshot {
        JobSnapshot {
            status: self.status,
            progress: self.progress,
            error: self.error.clone(),
        }
    }
}

/// Status view returned to clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JobSnapshot {
    pub status: JobStatus,
    pub progress: u8,
    pub error: Option<String>,
}

/// A finished job's payload, handed out once
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobDownload {
    /// Resolved source name, used for the file name
    pub source: String,
    pub body: String,
}

impl JobDownload {
    /// `{source}-tickers.csv`
    #[must_use]
    pub fn file_name(&self) -> String {
        format!("{}-tickers.csv", self.source)
    }
}

/// Liveness check payload
#[derive(Debug, Clone, Serialize)]
pub struct Health {
    pub ok: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}
