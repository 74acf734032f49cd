//! Query construction
//!
//! Turns the operator's year/granularity selection into a [`QuerySpec`].
//! Daily data is only served for short windows, so daily requests spanning
//! more than one year boundary are narrowed to the last two calendar years.

use chrono::NaiveDate;
use tracing::{debug, warn};

use crate::config::QueryConfig;
use crate::models::{Granularity, QuerySpec, Timeframe};
use crate::utils::error::QueryError;

/// Builds provider queries for a fixed keyword and geography
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    keyword: String,
    geo: String,
    category: u32,
}

impl QueryBuilder {
    #[must_use]
    pub fn new(keyword: impl Into<String>, geo: impl Into<String>, category: u32) -> Self {
        Self {
            keyword: keyword.into(),
            geo: geo.into(),
            category,
        }
    }

    #[must_use]
    pub fn from_config(config: &QueryConfig) -> Self {
        Self::new(config.keyword.clone(), config.geo.clone(), config.category)
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    /// Query spanning Jan 1 of `start_year` to Dec 31 of `end_year`
    ///
    /// # Errors
    ///
    /// `QueryError::ReversedYears` when `start_year > end_year`,
    /// `QueryError::InvalidYear` when a year has no calendar date.
    pub fn build_range(
        &self,
        start_year: i32,
        end_year: i32,
        granularity: Granularity,
    ) -> Result<QuerySpec, QueryError> {
        if start_year > end_year {
            return Err(QueryError::ReversedYears {
                start: start_year,
                end: end_year,
            });
        }

        let (effective_start, end_year) = effective_years(start_year, end_year, granularity);
        if effective_start != start_year {
            warn!(
                requested_start = start_year,
                effective_start,
                end_year,
                "Daily data limited to the last year boundary, narrowing range"
            );
            println!(
                "{}",
                crate::i18n::t!("query.daily_clamped", start = effective_start, end = end_year)
            );
        }
        let start_year = effective_start;

        let start =
            NaiveDate::from_ymd_opt(start_year, 1, 1).ok_or(QueryError::InvalidYear(start_year))?;
        let end =
            NaiveDate::from_ymd_opt(end_year, 12, 31).ok_or(QueryError::InvalidYear(end_year))?;

        let spec = self.spec(Timeframe::Range { start, end }, granularity);
        debug!(timeframe = %spec.timeframe, %granularity, "Built range query");
        Ok(spec)
    }

    /// Rolling query covering the last `months` months
    ///
    /// # Errors
    ///
    /// `QueryError::EmptyWindow` when `months` is 0.
    pub fn build_recent(&self, months: u32, granularity: Granularity) -> Result<QuerySpec, QueryError> {
        if months == 0 {
            return Err(QueryError::EmptyWindow);
        }

        let spec = self.spec(Timeframe::RecentMonths(months), granularity);
        debug!(timeframe = %spec.timeframe, %granularity, "Built rolling query");
        Ok(spec)
    }

    fn spec(&self, timeframe: Timeframe, granularity: Granularity) -> QuerySpec {
        QuerySpec {
            keyword: self.keyword.clone(),
            timeframe,
            geo: self.geo.clone(),
            category: self.category,
            property: String::new(),
            granularity,
        }
    }
}

/// Years actually queried for a selection
///
/// Daily requests with `end_year - start_year > 1` start at `end_year - 1`.
#[must_use]
pub fn effective_years(start_year: i32, end_year: i32, granularity: Granularity) -> (i32, i32) {
    if granularity == Granularity::Daily && end_year.saturating_sub(start_year) > 1 {
        (end_year - 1, end_year)
    } else {
        (start_year, end_year)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> QueryBuilder {
        QueryBuilder::new("turkcell", "TR", 0)
    }

    #[test]
    fn test_weekly_range_not_clamped() {
        let spec = builder()
            .build_range(2022, 2025, Granularity::Weekly)
            .unwrap();
        assert_eq!(spec.timeframe.to_string(), "2022-01-01 2025-12-31");
        assert_eq!(spec.keyword, "turkcell");
        assert_eq!(spec.geo, "TR");
        assert_eq!(spec.category, 0);
    }

    #[test]
    fn test_daily_range_clamped() {
        let spec = builder().build_range(2020, 2025, Granularity::Daily).unwrap();
        assert_eq!(spec.timeframe.to_string(), "2024-01-01 2025-12-31");
    }

    #[test]
    fn test_daily_single_year_untouched() {
        let spec = builder().build_range(2024, 2024, Granularity::Daily).unwrap();
        assert_eq!(spec.timeframe.to_string(), "2024-01-01 2024-12-31");

        let spec = builder().build_range(2024, 2025, Granularity::Daily).unwrap();
        assert_eq!(spec.timeframe.to_string(), "2024-01-01 2025-12-31");
    }

    #[test]
    fn test_effective_years_direct() {
        assert_eq!(effective_years(2020, 2025, Granularity::Daily), (2024, 2025));
        assert_eq!(effective_years(2023, 2025, Granularity::Daily), (2024, 2025));
        assert_eq!(effective_years(2024, 2025, Granularity::Daily), (2024, 2025));
        assert_eq!(effective_years(2020, 2025, Granularity::Weekly), (2020, 2025));
        assert_eq!(
            effective_years(i32::MIN, i32::MAX, Granularity::Daily),
            (i32::MAX - 1, i32::MAX)
        );
    }

    #[test]
    fn test_reversed_years_rejected() {
        let err = builder()
            .build_range(2025, 2022, Granularity::Weekly)
            .unwrap_err();
        assert_eq!(
            err,
            QueryError::ReversedYears {
                start: 2025,
                end: 2022
            }
        );
    }

    #[test]
    fn test_invalid_year_rejected() {
        let err = builder()
            .build_range(i32::MAX - 1, i32::MAX, Granularity::Weekly)
            .unwrap_err();
        assert!(matches!(err, QueryError::InvalidYear(_)));
    }

    #[test]
    fn test_recent_window() {
        let spec = builder().build_recent(12, Granularity::Daily).unwrap();
        assert_eq!(spec.timeframe.to_string(), "today 12-m");
        assert_eq!(
            builder().build_recent(0, Granularity::Daily).unwrap_err(),
            QueryError::EmptyWindow
        );
    }
}
