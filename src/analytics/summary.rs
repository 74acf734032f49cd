//! Descriptive statistics over an interest series
//!
//! Computes the figures printed after a fetch: min, max, mean, sample
//! standard deviation, median and the date interest peaked.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use statrs::statistics::{Data, OrderStatistics};
use std::fmt::Write as _;

use crate::models::InterestSeries;

/// Summary statistics for one series
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InterestSummary {
    /// Number of periods
    pub count: usize,

    pub min: u8,
    pub max: u8,
    pub mean: f64,

    /// Sample standard deviation (n - 1), absent for a single period
    pub std_dev: Option<f64>,

    /// Median, midpoint of the two central values for even counts
    pub median: f64,

    /// First date reaching `max`
    pub max_date: NaiveDate,

    pub first_date: NaiveDate,
    pub last_date: NaiveDate,
}

/// Summarize `series`, `None` when it has no rows
#[must_use]
pub fn summarize(series: &InterestSeries) -> Option<InterestSummary> {
    let points = series.points();
    let first = points.first()?;
    let last = points.last()?;

    let max = series.scores().max()?;
    let min = series.scores().min()?;
    let max_date = points.iter().find(|p| p.score == max)?.date;

    let values: Vec<f64> = series.scores().map(f64::from).collect();
    // Statistics is not imported: its min/max would shadow Iterator's
    let mean = statrs::statistics::Statistics::mean(&values);
    let std_dev = (values.len() > 1).then(|| statrs::statistics::Statistics::std_dev(&values));
    let median = Data::new(values).median();

    Some(InterestSummary {
        count: points.len(),
        min,
        max,
        mean,
        std_dev,
        median,
        max_date,
        first_date: first.date,
        last_date: last.date,
    })
}

impl InterestSummary {
    /// Console block printed after a successful fetch
    #[must_use]
    pub fn report(&self, keyword: &str) -> String {
        let rule = "=".repeat(50);
        let mut out = String::new();

        let _ = writeln!(out, "\n{rule}");
        let _ = writeln!(
            out,
            "{}",
            crate::i18n::t!("summary.title", keyword = keyword.to_uppercase())
        );
        let _ = writeln!(out, "{rule}");
        let _ = writeln!(
            out,
            "{}",
            crate::i18n::t!(
                "summary.date_range",
                start = self.first_date.format("%Y-%m-%d"),
                end = self.last_date.format("%Y-%m-%d")
            )
        );
        let _ = writeln!(out, "{}", crate::i18n::t!("summary.max", value = self.max));
        let _ = writeln!(out, "{}", crate::i18n::t!("summary.min", value = self.min));
        let _ = writeln!(
            out,
            "{}",
            crate::i18n::t!("summary.mean", value = format!("{:.1}", self.mean))
        );
        let std_dev = self
            .std_dev
            .map_or_else(|| "-".to_string(), |s| format!("{s:.1}"));
        let _ = writeln!(out, "{}", crate::i18n::t!("summary.std_dev", value = std_dev));
        let _ = writeln!(
            out,
            "{}",
            crate::i18n::t!("summary.median", value = format!("{:.1}", self.median))
        );
        let _ = writeln!(
            out,
            "{}",
            crate::i18n::t!("summary.max_date", date = self.max_date.format("%Y-%m-%d"))
        );
        let _ = write!(out, "{rule}");

        out
    }
}
