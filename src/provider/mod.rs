//! Trends data provider
//!
//! [`TrendsProvider`] is the seam between the session and the remote API.
//! [`TrendsClient`] talks to the real web endpoints; tests substitute their
//! own implementations.

pub mod client;
pub mod payload;

pub use client::TrendsClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::models::{InterestSeries, QuerySpec, RegionalInterest};
use crate::utils::error::FetchError;

/// Level at which regional interest is aggregated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Resolution {
    Country,
    /// Country subdivisions (provinces, states)
    #[default]
    Region,
    City,
    /// Designated market areas, US only
    Dma,
}

impl Resolution {
    /// Identifier used in provider requests
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Country => "COUNTRY",
            Self::Region => "REGION",
            Self::City => "CITY",
            Self::Dma => "DMA",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source of search-interest data
#[async_trait]
pub trait TrendsProvider: Send + Sync {
    /// Time series for `spec`, without partial-period indicator
    ///
    /// # Errors
    ///
    /// `FetchError::EmptyResponse` when the provider has no rows, a transport
    /// or malformed-response variant otherwise.
    async fn interest_over_time(&self, spec: &QuerySpec) -> Result<InterestSeries, FetchError>;

    /// Regional breakdown for the query `series` was fetched with
    ///
    /// Low-volume regions are included, geo codes are not kept, and the
    /// result is sorted by score descending.
    ///
    /// # Errors
    ///
    /// `FetchError::MissingSeries`, without any remote call, when `series`
    /// is empty.
    async fn interest_by_region(
        &self,
        series: &InterestSeries,
        resolution: Resolution,
    ) -> Result<RegionalInterest, FetchError>;
}
