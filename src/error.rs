//! Unified error handling for the trendlens crate
//!
//! This module provides a unified error type that consolidates all domain-specific
//! errors into a single `Error` enum, while maintaining the ability to use
//! domain-specific errors when needed.
//!
//! # Architecture
//!
//! - [`TrendsErrorTrait`] - Common interface implemented by all error types
//! - [`ErrorCategory`] - Classification of errors for handling strategies
//! - [`Error`] - Unified error enum wrapping all domain-specific errors
//!
//! # Usage
//!
//! ```rust,ignore
//! use trendlens::error::{Error, TrendsErrorTrait};
//!
//! fn handle_error(err: Error) {
//!     if err.is_recoverable() {
//!         println!("Try again later: {}", err.localized_desc());
//!     } else {
//!         eprintln!("Fatal error: {}", err);
//!     }
//! }
//! ```

use thiserror::Error;

// Re-export domain-specific errors for convenience
pub use crate::utils::error::{ChartError, ExportError, FetchError, FetchFailure, QueryError};

/// Common trait for all trendlens error types
pub trait TrendsErrorTrait: std::error::Error {
    /// Check if this error is recoverable (can be retried)
    fn is_recoverable(&self) -> bool;

    /// Get localized description for user-facing messages
    fn localized_desc(&self) -> String;

    /// Get the error category for handling strategies
    fn category(&self) -> ErrorCategory;
}

/// Classification of errors for handling strategies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Network-related errors (HTTP, timeout, rate limit)
    Network,
    /// Response decoding errors
    Parsing,
    /// Provider returned nothing
    EmptyResult,
    /// A step was skipped because an earlier one produced nothing
    Precondition,
    /// Query construction errors
    Query,
    /// Chart rendering errors
    Rendering,
    /// Export and I/O errors
    Storage,
}

impl ErrorCategory {
    /// Get localized description for the category
    pub fn localized_desc(&self) -> String {
        match self {
            Self::Network => crate::i18n::t!("errors.category.network").to_string(),
            Self::Parsing => crate::i18n::t!("errors.category.parsing").to_string(),
            Self::EmptyResult => crate::i18n::t!("errors.category.empty").to_string(),
            Self::Precondition => crate::i18n::t!("errors.category.precondition").to_string(),
            Self::Query => crate::i18n::t!("errors.category.query").to_string(),
            Self::Rendering => crate::i18n::t!("errors.category.rendering").to_string(),
            Self::Storage => crate::i18n::t!("errors.category.storage").to_string(),
        }
    }
}

/// Unified error type for the trendlens crate
#[derive(Error, Debug)]
pub enum Error {
    /// Query construction errors
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    /// Provider fetch errors
    #[error("Fetch error: {0}")]
    Fetch(#[from] FetchError),

    /// Chart rendering errors
    #[error("Chart error: {0}")]
    Chart(#[from] ChartError),

    /// Export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),
}

impl TrendsErrorTrait for Error {
    fn is_recoverable(&self) -> bool {
        match self {
            Self::Fetch(e) => e.is_recoverable(),
            Self::Query(_) | Self::Chart(_) | Self::Export(_) => false,
        }
    }

    fn localized_desc(&self) -> String {
        match self {
            Self::Fetch(e) => match e.kind() {
                FetchFailure::Transport => {
                    crate::i18n::t!("errors.fetch.transport", error = e.to_string()).to_string()
                }
                FetchFailure::Malformed => {
                    crate::i18n::t!("errors.fetch.malformed", error = e.to_string()).to_string()
                }
                FetchFailure::Empty => crate::i18n::t!("errors.fetch.empty").to_string(),
                FetchFailure::Precondition => {
                    crate::i18n::t!("errors.fetch.missing_series").to_string()
                }
            },
            Self::Query(e) => format!("{}: {e}", self.category().localized_desc()),
            Self::Chart(e) => format!("{}: {e}", self.category().localized_desc()),
            Self::Export(e) => format!("{}: {e}", self.category().localized_desc()),
        }
    }

    fn category(&self) -> ErrorCategory {
        match self {
            Self::Fetch(e) => match e.kind() {
                FetchFailure::Transport => ErrorCategory::Network,
                FetchFailure::Malformed => ErrorCategory::Parsing,
                FetchFailure::Empty => ErrorCategory::EmptyResult,
                FetchFailure::Precondition => ErrorCategory::Precondition,
            },
            Self::Query(_) => ErrorCategory::Query,
            Self::Chart(ChartError::NoData) | Self::Export(ExportError::NoData) => {
                ErrorCategory::Precondition
            }
            Self::Chart(_) => ErrorCategory::Rendering,
            Self::Export(_) => ErrorCategory::Storage,
        }
    }
}
