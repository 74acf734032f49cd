//! Common utilities and helper functions
//!
//! This module provides shared utilities used across the application.

pub mod error;

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate};
use url::Url;

/// Prefix the provider puts in front of JSON bodies to defeat script inclusion
const XSSI_PREFIX: &str = ")]}'";

/// Strip the anti-XSSI prefix (and the comma some endpoints add after it)
#[must_use]
pub fn strip_xssi_prefix(body: &str) -> &str {
    let trimmed = body.trim_start();
    match trimmed.strip_prefix(XSSI_PREFIX) {
        Some(rest) => rest.trim_start_matches(',').trim_start(),
        None => trimmed,
    }
}

/// Convert a unix timestamp in seconds (as sent by the provider) to a UTC date
pub fn date_from_unix(secs: &str) -> Result<NaiveDate> {
    let secs: i64 = secs
        .trim()
        .parse()
        .with_context(|| format!("Invalid timestamp: {secs}"))?;

    DateTime::from_timestamp(secs, 0)
        .map(|dt| dt.date_naive())
        .with_context(|| format!("Timestamp out of range: {secs}"))
}

/// Extract domain from URL
pub fn extract_domain(url: &str) -> Result<String> {
    let parsed = Url::parse(url).context("Invalid URL")?;

    parsed
        .host_str()
        .map(|s| s.to_string())
        .context("No host in URL")
}

/// Sanitize filename by removing invalid characters
pub fn sanitize_filename(filename: &str) -> String {
    filename
        .trim()
        .chars()
        .map(|c| match c {
            '<' | '>' | ':' | '"' | '/' | '\\' | '|' | '?' | '*' => '_',
            c if c.is_whitespace() => '_',
            c => c,
        })
        .collect()
}

/// Truncate text to a maximum number of characters
pub fn truncate_text(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        text.to_string()
    } else {
        let truncated: String = text.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}
