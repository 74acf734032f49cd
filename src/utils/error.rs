//! Error types for the trendlens pipeline
//!
//! This module defines the domain error types used by each session step.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while building a provider query
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum QueryError {
    /// Start year after end year
    #[error("Start year {start} is after end year {end}")]
    ReversedYears { start: i32, end: i32 },

    /// Year outside the supported calendar range
    #[error("Invalid year: {0}")]
    InvalidYear(i32),

    /// Rolling window of zero months
    #[error("Rolling window must cover at least one month")]
    EmptyWindow,
}

/// Errors that can occur during provider fetch operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Rate limit exceeded
    #[error("Rate limit exceeded")]
    RateLimit,

    /// Non-success status code
    #[error("Server returned status {0}")]
    Status(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Response body could not be interpreted
    #[error("Malformed response: {0}")]
    Malformed(String),

    /// Explore response lacked the widget needed for the request
    #[error("Widget not found in explore response: {0}")]
    MissingWidget(&'static str),

    /// Provider answered but had no rows
    #[error("Provider returned no data")]
    EmptyResponse,

    /// Regional data requested without a fetched series
    #[error("Interest-over-time data must be fetched first")]
    MissingSeries,
}

/// Coarse classification of a [`FetchError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FetchFailure {
    /// Network, timeout or non-success status
    Transport,
    /// Response arrived but could not be decoded
    Malformed,
    /// Response decoded but contained no rows
    Empty,
    /// Call was not attempted
    Precondition,
}

impl FetchError {
    /// Classify this error
    #[must_use]
    pub fn kind(&self) -> FetchFailure {
        match self {
            Self::Http(_)
            | Self::RateLimit
            | Self::Status(_)
            | Self::Timeout
            | Self::MaxRetriesExceeded => FetchFailure::Transport,
            Self::Malformed(_) | Self::MissingWidget(_) => FetchFailure::Malformed,
            Self::EmptyResponse => FetchFailure::Empty,
            Self::MissingSeries => FetchFailure::Precondition,
        }
    }

    /// Whether the same request could succeed if tried again later
    #[must_use]
    pub fn is_recoverable(&self) -> bool {
        match self {
            Self::Http(_) | Self::RateLimit | Self::Timeout | Self::MaxRetriesExceeded => true,
            Self::Status(code) => matches!(code, 429 | 500 | 502 | 503 | 504),
            Self::Malformed(_)
            | Self::MissingWidget(_)
            | Self::EmptyResponse
            | Self::MissingSeries => false,
        }
    }
}

/// Errors that can occur while rendering charts
#[derive(Error, Debug)]
pub enum ChartError {
    /// Nothing to draw
    #[error("No data to plot")]
    NoData,

    /// Backend drawing failure
    #[error("Drawing failed: {0}")]
    Draw(String),
}

/// Errors that can occur while writing export files
#[derive(Error, Debug)]
pub enum ExportError {
    /// Nothing to write
    #[error("No data to export")]
    NoData,

    /// CSV writer failure
    #[error("CSV write to {path} failed: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// Filesystem failure
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_failure_kind() {
        assert_eq!(FetchError::Timeout.kind(), FetchFailure::Transport);
        assert_eq!(FetchError::Status(404).kind(), FetchFailure::Transport);
        assert_eq!(
            FetchError::Malformed("bad json".into()).kind(),
            FetchFailure::Malformed
        );
        assert_eq!(
            FetchError::MissingWidget("TIMESERIES").kind(),
            FetchFailure::Malformed
        );
        assert_eq!(FetchError::EmptyResponse.kind(), FetchFailure::Empty);
        assert_eq!(FetchError::MissingSeries.kind(), FetchFailure::Precondition);
    }

    #[test]
    fn test_fetch_recoverable() {
        assert!(FetchError::Status(503).is_recoverable());
        assert!(!FetchError::Status(404).is_recoverable());
        assert!(!FetchError::EmptyResponse.is_recoverable());
    }

    #[test]
    fn test_query_error_message() {
        let err = QueryError::ReversedYears {
            start: 2025,
            end: 2022,
        };
        assert_eq!(err.to_string(), "Start year 2025 is after end year 2022");
    }
}
