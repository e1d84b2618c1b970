// src/error.rs
//
// ValidationError: the input URL was rejected before any network call.
// FetchError: the single page fetch failed and no report is produced.
// AnalyzeError: what `analyze` returns, one of the two above.
// StoreError: report storage and legacy migration failures.
// ConfigError: invalid runtime configuration.

use std::time::Duration;
use thiserror::Error;

/// Reasons a URL is refused before fetching.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Invalid URL '{url}': {reason}")]
    Malformed { url: String, reason: String },

    #[error("Unsupported URL scheme '{0}': only http and https can be analyzed")]
    UnsupportedScheme(String),

    #[error("URL has no host")]
    MissingHost,

    #[error("Analysis of local networks is not supported ({0})")]
    DisallowedHost(String),
}

/// Transport-level failures of the page fetch.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("Failed to fetch URL: request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    #[error("Failed to fetch URL: {0}")]
    Network(String),

    #[error("Failed to read response body: {0}")]
    Body(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyzeError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Fetch(#[from] FetchError),
}

impl AnalyzeError {
    /// Short machine-readable kind, used in HTTP error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            AnalyzeError::Validation(_) => "validation",
            AnalyzeError::Fetch(_) => "fetch",
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Malformed stored report: {0}")]
    Malformed(#[from] serde_json::Error),

    #[error("Stored report is missing required field '{0}'")]
    MissingField(&'static str),

    #[error("Stored report has invalid '{field}': {reason}")]
    InvalidField { field: &'static str, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("Timeout must be at least one second")]
    ZeroTimeout,

    #[error("Invalid bind address '{0}'")]
    InvalidBindAddress(String),
}
