//! Configuration errors

use thiserror::Error;

/// Errors raised while building or loading a `ScrapeConfig`
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Page size of zero would produce an infinite plan
    #[error("page_size must be greater than zero")]
    ZeroPageSize,

    /// Concurrency outside the supported range
    #[error("concurrency must be between 1 and {max}, got {value}")]
    Concurrency { value: usize, max: usize },

    /// Durations that must be non-zero
    #[error("{field} must be greater than zero")]
    ZeroDuration { field: &'static str },

    /// Source catalogue problems
    #[error("Invalid source '{name}': {reason}")]
    InvalidSource { name: String, reason: String },

    /// Default source not present in the catalogue
    #[error("Default source '{0}' is not in the source catalogue")]
    UnknownDefaultSource(String),

    /// Environment variable that could not be parsed
    #[error("Invalid value '{value}' for environment variable {var}")]
    InvalidEnv { var: &'static str, value: String },
}
