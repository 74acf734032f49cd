//! Core data structures shared across the session pipeline
//!
//! Queries ([`QuerySpec`]), fetched data ([`InterestSeries`],
//! [`RegionalInterest`]) and the run modes offered to the operator.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Keyword tracked when nothing else is configured
pub const DEFAULT_KEYWORD: &str = "turkcell";

/// Geography tracked when nothing else is configured
pub const DEFAULT_GEO: &str = "TR";

/// Sampling granularity of an interest series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Granularity {
    /// One row per day
    Daily,
    /// One row per week
    Weekly,
}

impl Granularity {
    /// Lowercase identifier used in file names and logs
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
        }
    }
}

impl fmt::Display for Granularity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive date range sent to the provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Timeframe {
    /// Explicit calendar range
    Range { start: NaiveDate, end: NaiveDate },

    /// Rolling window ending today
    RecentMonths(u32),
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Range { start, end } => {
                write!(f, "{} {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"))
            }
            Self::RecentMonths(months) => write!(f, "today {months}-m"),
        }
    }
}

/// A fully-specified provider query
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuerySpec {
    /// Search term
    pub keyword: String,

    /// Date range
    pub timeframe: Timeframe,

    /// Geography code (e.g. `TR`)
    pub geo: String,

    /// Provider category id, 0 for all categories
    pub category: u32,

    /// Search property filter, empty for web search
    pub property: String,

    /// Requested granularity; the provider picks the actual sampling
    pub granularity: Granularity,
}

/// Single row of an interest series
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestPoint {
    pub date: NaiveDate,

    /// Normalized interest, 0..=100
    pub score: u8,
}

impl InterestPoint {
    #[must_use]
    pub fn new(date: NaiveDate, score: u8) -> Self {
        Self {
            date,
            score: score.min(100),
        }
    }
}

/// Time-indexed search interest for one query
///
/// Dates are strictly increasing. Construction sorts the input and drops
/// repeated dates, keeping the first occurrence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "InterestSeriesRecord")]
pub struct InterestSeries {
    spec: QuerySpec,
    points: Vec<InterestPoint>,
}

/// Deserialized shape of [`InterestSeries`] before ordering is restored
#[derive(Deserialize)]
struct InterestSeriesRecord {
    spec: QuerySpec,
    points: Vec<InterestPoint>,
}

impl From<InterestSeriesRecord> for InterestSeries {
    fn from(record: InterestSeriesRecord) -> Self {
        Self::new(record.spec, record.points)
    }
}

impl InterestSeries {
    /// Build a series from rows in any order
    #[must_use]
    pub fn new(spec: QuerySpec, points: impl IntoIterator<Item = InterestPoint>) -> Self {
        let mut points: Vec<InterestPoint> = points.into_iter().collect();
        points.sort_by_key(|p| p.date);
        points.dedup_by_key(|p| p.date);
        Self { spec, points }
    }

    /// Query this series was fetched with
    #[must_use]
    pub fn spec(&self) -> &QuerySpec {
        &self.spec
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.spec.keyword
    }

    #[must_use]
    pub fn points(&self) -> &[InterestPoint] {
        &self.points
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    #[must_use]
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.first().map(|p| p.date)
    }

    #[must_use]
    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.last().map(|p| p.date)
    }

    /// Scores in chronological order
    pub fn scores(&self) -> impl Iterator<Item = u8> + '_ {
        self.points.iter().map(|p| p.score)
    }
}

/// Interest for one region
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionScore {
    pub name: String,
    pub score: u8,
}

impl RegionScore {
    #[must_use]
    pub fn new(name: impl Into<String>, score: u8) -> Self {
        Self {
            name: name.into(),
            score: score.min(100),
        }
    }
}

/// Region-indexed search interest, sorted by score descending
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RegionalRecord")]
pub struct RegionalInterest {
    keyword: String,
    regions: Vec<RegionScore>,
}

#[derive(Deserialize)]
struct RegionalRecord {
    keyword: String,
    regions: Vec<RegionScore>,
}

impl From<RegionalRecord> for RegionalInterest {
    fn from(record: RegionalRecord) -> Self {
        Self::new(record.keyword, record.regions)
    }
}

impl RegionalInterest {
    /// Build from unsorted rows
    ///
    /// Sorting is stable so regions with equal scores keep provider order.
    /// Repeated region names keep their first row.
    #[must_use]
    pub fn new(keyword: impl Into<String>, regions: impl IntoIterator<Item = RegionScore>) -> Self {
        let mut seen = HashSet::new();
        let mut regions: Vec<RegionScore> = regions
            .into_iter()
            .filter(|r| seen.insert(r.name.clone()))
            .collect();
        regions.sort_by(|a, b| b.score.cmp(&a.score));

        Self {
            keyword: keyword.into(),
            regions,
        }
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    #[must_use]
    pub fn regions(&self) -> &[RegionScore] {
        &self.regions
    }

    /// Highest-scoring `n` regions
    #[must_use]
    pub fn top(&self, n: usize) -> &[RegionScore] {
        &self.regions[..n.min(self.regions.len())]
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}

/// The three analyses offered by the interactive menu
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunMode {
    /// Weekly data, 2022 through 2025
    WeeklyMultiYear,
    /// Daily data for 2024
    DailyYear,
    /// Daily data for the last 12 months
    DailyLast12Months,
}

impl RunMode {
    /// All modes in menu order
    pub const ALL: [Self; 3] = [
        Self::WeeklyMultiYear,
        Self::DailyYear,
        Self::DailyLast12Months,
    ];

    /// Interpret a menu answer
    ///
    /// Anything other than `2` or `3` selects the weekly analysis.
    #[must_use]
    pub fn from_choice(choice: &str) -> Self {
        match choice.trim() {
            "2" => Self::DailyYear,
            "3" => Self::DailyLast12Months,
            _ => Self::WeeklyMultiYear,
        }
    }

    /// Parse a command-line mode name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "weekly" | "1" => Some(Self::WeeklyMultiYear),
            "daily-year" | "daily" | "2" => Some(Self::DailyYear),
            "daily-12m" | "recent" | "3" => Some(Self::DailyLast12Months),
            _ => None,
        }
    }

    /// Menu number shown to the operator
    #[must_use]
    pub fn number(&self) -> u8 {
        match self {
            Self::WeeklyMultiYear => 1,
            Self::DailyYear => 2,
            Self::DailyLast12Months => 3,
        }
    }

    #[must_use]
    pub fn granularity(&self) -> Granularity {
        match self {
            Self::WeeklyMultiYear => Granularity::Weekly,
            Self::DailyYear | Self::DailyLast12Months => Granularity::Daily,
        }
    }

    /// Series export file name for `keyword`
    #[must_use]
    pub fn series_file_name(&self, keyword: &str) -> String {
        let stem = crate::utils::sanitize_filename(keyword);
        match self {
            Self::WeeklyMultiYear => format!("{stem}_trends_2022_2025_weekly.csv"),
            Self::DailyYear => format!("{stem}_trends_2024_daily.csv"),
            Self::DailyLast12Months => format!("{stem}_trends_last_12m_daily.csv"),
        }
    }

    /// Regional export file name for `keyword`, identical for every mode
    #[must_use]
    pub fn regional_file_name(&self, keyword: &str) -> String {
        format!("{}_regional_trends.csv", crate::utils::sanitize_filename(keyword))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn spec() -> QuerySpec {
        QuerySpec {
            keyword: DEFAULT_KEYWORD.to_string(),
            timeframe: Timeframe::RecentMonths(12),
            geo: DEFAULT_GEO.to_string(),
            category: 0,
            property: String::new(),
            granularity: Granularity::Daily,
        }
    }

    #[test]
    fn test_timeframe_display() {
        let range = Timeframe::Range {
            start: date(2022, 1, 1),
            end: date(2025, 12, 31),
        };
        assert_eq!(range.to_string(), "2022-01-01 2025-12-31");
        assert_eq!(Timeframe::RecentMonths(12).to_string(), "today 12-m");
    }

    #[test]
    fn test_series_sorted_and_deduplicated() {
        let series = InterestSeries::new(
            spec(),
            vec![
                InterestPoint::new(date(2024, 1, 3), 15),
                InterestPoint::new(date(2024, 1, 1), 5),
                InterestPoint::new(date(2024, 1, 2), 10),
                InterestPoint::new(date(2024, 1, 1), 99),
            ],
        );

        let dates: Vec<_> = series.points().iter().map(|p| p.date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert_eq!(series.first_date(), Some(date(2024, 1, 1)));
        assert_eq!(series.last_date(), Some(date(2024, 1, 3)));
    }

    #[test]
    fn test_scores_clamped_to_100() {
        assert_eq!(InterestPoint::new(date(2024, 1, 1), 250).score, 100);
        assert_eq!(RegionScore::new("Ankara", 101).score, 100);
    }

    #[test]
    fn test_regional_sorted_descending_stable() {
        let regional = RegionalInterest::new(
            "turkcell",
            vec![
                RegionScore::new("Ankara", 80),
                RegionScore::new("Istanbul", 100),
                RegionScore::new("Izmir", 80),
                RegionScore::new("Ankara", 5),
            ],
        );

        let names: Vec<_> = regional.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Istanbul", "Ankara", "Izmir"]);
        assert_eq!(regional.top(2).len(), 2);
        assert_eq!(regional.top(50).len(), 3);
    }

    #[test]
    fn test_deserialized_series_is_reordered() {
        let series = InterestSeries::new(
            spec(),
            vec![
                InterestPoint::new(date(2024, 1, 1), 5),
                InterestPoint::new(date(2024, 1, 2), 10),
            ],
        );
        let mut json = serde_json::to_value(&series).unwrap();
        json["points"] = serde_json::json!([
            { "date": "2024-01-02", "score": 10 },
            { "date": "2024-01-01", "score": 5 },
            { "date": "2024-01-02", "score": 70 },
        ]);

        let restored: InterestSeries = serde_json::from_value(json).unwrap();
        assert_eq!(restored, series);
    }

    #[test]
    fn test_deserialized_regional_is_reordered() {
        let json = serde_json::json!({
            "keyword": "turkcell",
            "regions": [
                { "name": "Bayburt", "score": 12 },
                { "name": "Istanbul", "score": 100 },
                { "name": "Bayburt", "score": 90 },
                { "name": "Izmir", "score": 83 },
            ],
        });

        let regional: RegionalInterest = serde_json::from_value(json).unwrap();
        let names: Vec<_> = regional.regions().iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["Istanbul", "Izmir", "Bayburt"]);
        assert_eq!(regional.regions()[2].score, 12);
    }

    #[test]
    fn test_run_mode_choice_fallback() {
        assert_eq!(RunMode::from_choice("2"), RunMode::DailyYear);
        assert_eq!(RunMode::from_choice(" 3 \n"), RunMode::DailyLast12Months);
        assert_eq!(RunMode::from_choice("1"), RunMode::WeeklyMultiYear);
        assert_eq!(RunMode::from_choice("banana"), RunMode::WeeklyMultiYear);
    }

    #[test]
    fn test_run_mode_file_names() {
        assert_eq!(
            RunMode::WeeklyMultiYear.series_file_name("turkcell"),
            "turkcell_trends_2022_2025_weekly.csv"
        );
        assert_eq!(
            RunMode::DailyYear.series_file_name("turkcell"),
            "turkcell_trends_2024_daily.csv"
        );
        assert_eq!(
            RunMode::DailyLast12Months.series_file_name("turkcell"),
            "turkcell_trends_last_12m_daily.csv"
        );
        assert_eq!(
            RunMode::DailyYear.regional_file_name("turkcell"),
            "turkcell_regional_trends.csv"
        );
    }

    #[test]
    fn test_run_mode_from_name() {
        assert_eq!(RunMode::from_name("weekly"), Some(RunMode::WeeklyMultiYear));
        assert_eq!(RunMode::from_name("Daily-12m"), Some(RunMode::DailyLast12Months));
        assert_eq!(RunMode::from_name("hourly"), None);
    }
}
