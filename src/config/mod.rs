//! Configuration management for trendlens
//!
//! This module handles loading and validating configuration from environment variables
//! (after the `.env` file has been applied) and TOML files.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::models::{DEFAULT_GEO, DEFAULT_KEYWORD};

/// Upper bound for `provider.max_retries`
pub const MAX_RETRIES: u32 = 10;

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Provider connection settings
    pub provider: ProviderConfig,

    /// What to query
    pub query: QueryConfig,

    /// Where and how to write results
    pub output: OutputConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Provider connection settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Provider base URL
    pub base_url: String,

    /// Host language sent with every request
    pub host_language: String,

    /// Timezone offset in minutes sent with every request
    pub tz_offset: i32,

    /// Request timeout in seconds
    pub request_timeout_secs: u64,

    /// Rate limit (requests per second)
    pub rate_limit: u32,

    /// Retry attempts on 429/5xx, 0 disables retrying
    pub max_retries: u32,

    /// Base delay for exponential backoff in milliseconds
    pub retry_base_delay_ms: u64,

    /// User agent string, a browser-like one is picked when unset
    pub user_agent: Option<String>,
}

/// Query settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryConfig {
    /// Search term
    pub keyword: String,

    /// Geography code
    pub geo: String,

    /// Provider category id
    pub category: u32,
}

/// Output settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory receiving CSV exports and charts
    pub dir: PathBuf,

    /// Number of regions in the bar chart
    pub regional_top_n: usize,

    /// Number of regions previewed on the console
    pub preview_rows: usize,

    /// Write SVG charts
    pub charts: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (text, json)
    pub format: String,
}

fn env_or<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse::<T>().ok())
        .unwrap_or(default)
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let defaults = Self::default();

        let base_url =
            std::env::var("TRENDLENS_BASE_URL").unwrap_or(defaults.provider.base_url);
        let host_language =
            std::env::var("TRENDLENS_HL").unwrap_or(defaults.provider.host_language);
        let user_agent = std::env::var("TRENDLENS_USER_AGENT").ok();

        let keyword = std::env::var("TRENDLENS_KEYWORD").unwrap_or(defaults.query.keyword);
        let geo = std::env::var("TRENDLENS_GEO").unwrap_or(defaults.query.geo);

        let dir = std::env::var("TRENDLENS_OUTPUT_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.output.dir);

        let level = std::env::var("TRENDLENS_LOG_LEVEL").unwrap_or(defaults.logging.level);
        let format = std::env::var("TRENDLENS_LOG_FORMAT").unwrap_or(defaults.logging.format);

        Ok(Self {
            provider: ProviderConfig {
                base_url,
                host_language,
                tz_offset: env_or("TRENDLENS_TZ", defaults.provider.tz_offset),
                request_timeout_secs: env_or(
                    "TRENDLENS_REQUEST_TIMEOUT",
                    defaults.provider.request_timeout_secs,
                ),
                rate_limit: env_or("TRENDLENS_RATE_LIMIT", defaults.provider.rate_limit),
                max_retries: env_or("TRENDLENS_MAX_RETRIES", defaults.provider.max_retries),
                retry_base_delay_ms: env_or(
                    "TRENDLENS_RETRY_DELAY_MS",
                    defaults.provider.retry_base_delay_ms,
                ),
                user_agent,
            },
            query: QueryConfig {
                keyword,
                geo,
                category: env_or("TRENDLENS_CATEGORY", defaults.query.category),
            },
            output: OutputConfig {
                dir,
                regional_top_n: env_or("TRENDLENS_TOP_N", defaults.output.regional_top_n),
                preview_rows: env_or("TRENDLENS_PREVIEW_ROWS", defaults.output.preview_rows),
                charts: env_or("TRENDLENS_CHARTS", defaults.output.charts),
            },
            logging: LoggingConfig { level, format },
        })
    }

    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Self = toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config file: {}", path.display()))?;

        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        crate::utils::extract_domain(&self.provider.base_url)
            .with_context(|| format!("base_url is not a valid URL: {}", self.provider.base_url))?;

        if self.provider.rate_limit == 0 {
            anyhow::bail!("rate_limit must be greater than 0");
        }

        if self.provider.max_retries > MAX_RETRIES {
            anyhow::bail!("max_retries must be at most {MAX_RETRIES}");
        }

        if self.provider.request_timeout_secs == 0 {
            anyhow::bail!("request_timeout_secs must be greater than 0");
        }

        if self.query.keyword.trim().is_empty() {
            anyhow::bail!("keyword must not be empty");
        }

        if self.output.regional_top_n == 0 {
            anyhow::bail!("regional_top_n must be greater than 0");
        }

        Ok(())
    }
}

impl ProviderConfig {
    /// Get request timeout as Duration
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderConfig {
                base_url: String::from("https://trends.google.com"),
                host_language: String::from("tr-TR"),
                tz_offset: 180,
                request_timeout_secs: 30,
                rate_limit: 1,
                max_retries: 0,
                retry_base_delay_ms: 1000,
                user_agent: None,
            },
            query: QueryConfig {
                keyword: String::from(DEFAULT_KEYWORD),
                geo: String::from(DEFAULT_GEO),
                category: 0,
            },
            output: OutputConfig {
                dir: PathBuf::from("."),
                regional_top_n: 15,
                preview_rows: 10,
                charts: true,
            },
            logging: LoggingConfig {
                level: String::from("info"),
                format: String::from("text"),
            },
        }
    }
}
