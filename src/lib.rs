//! trendlens - search-interest analysis for a keyword
//!
//! Fetches interest-over-time and interest-by-region data from Google Trends,
//! summarizes it, draws it and writes it to CSV.
//!
//! # Architecture
//!
//! The library is organized into several modules:
//!
//! - [`config`] - Configuration management and settings
//! - [`query`] - Query construction and timeframe rules
//! - [`provider`] - Trends HTTP client behind the [`provider::TrendsProvider`] trait
//! - [`analytics`] - Summary statistics
//! - [`chart`] - SVG chart rendering
//! - [`export`] - CSV export
//! - [`session`] - The fetch → analyze → plot → save cycle
//! - [`models`] - Core data structures and types
//! - [`utils`] - Common utilities and helpers
//!
//! # Example
//!
//! ```no_run
//! use trendlens::config::Config;
//! use trendlens::models::RunMode;
//! use trendlens::provider::TrendsClient;
//! use trendlens::session::TrendsSession;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::from_env()?;
//!     let client = TrendsClient::new(&config.provider)?;
//!     let mut session = TrendsSession::new(client, &config);
//!     let report = session.run(RunMode::DailyLast12Months).await;
//!     println!("{} files written", report.exports.len());
//!     Ok(())
//! }
//! ```

// Initialize rust-i18n at crate root level
rust_i18n::i18n!("locales", fallback = "en");

pub mod analytics;
pub mod chart;
pub mod config;
pub mod error;
pub mod export;
pub mod i18n;
pub mod models;
pub mod provider;
pub mod query;
pub mod session;
pub mod utils;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::analytics::{summarize, InterestSummary};
    pub use crate::chart::ChartRenderer;
    pub use crate::config::Config;
    pub use crate::error::{Error, ErrorCategory, TrendsErrorTrait};
    pub use crate::export::Exporter;
    pub use crate::models::{InterestSeries, QuerySpec, RegionalInterest, RunMode};
    pub use crate::provider::{Resolution, TrendsClient, TrendsProvider};
    pub use crate::query::QueryBuilder;
    pub use crate::session::{SessionReport, TrendsSession};
}

// Direct re-exports for convenience
pub use models::{InterestSeries, RegionalInterest, RunMode};
