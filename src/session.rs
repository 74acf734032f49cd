//! One fetch → analyze → plot → save cycle
//!
//! [`TrendsSession`] owns the two data containers between steps. Every step
//! degrades to "skip and tell the operator" on failure so a broken fetch
//! never aborts the run.

use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::analytics::{summarize, InterestSummary};
use crate::chart::ChartRenderer;
use crate::config::{Config, OutputConfig};
use crate::error::{Error, TrendsErrorTrait};
use crate::export::Exporter;
use crate::i18n::t;
use crate::models::{Granularity, InterestSeries, QuerySpec, RegionalInterest, RunMode};
use crate::provider::{Resolution, TrendsProvider};
use crate::query::QueryBuilder;
use crate::utils::error::{ChartError, FetchError, QueryError};

/// What a session run produced
#[derive(Debug, Clone, Default)]
pub struct SessionReport {
    /// Rows in the fetched series, 0 when the fetch failed
    pub series_rows: usize,

    /// Regions fetched, 0 when skipped or failed
    pub regions: usize,

    pub summary: Option<InterestSummary>,

    /// CSV files written
    pub exports: Vec<PathBuf>,

    /// SVG charts written
    pub charts: Vec<PathBuf>,
}

/// Interactive trends session over a provider
pub struct TrendsSession<P: TrendsProvider> {
    provider: P,
    builder: QueryBuilder,
    renderer: ChartRenderer,
    exporter: Exporter,
    output: OutputConfig,
    resolution: Resolution,
    series: Option<InterestSeries>,
    regional: Option<RegionalInterest>,
}

impl<P: TrendsProvider> TrendsSession<P> {
    pub fn new(provider: P, config: &Config) -> Self {
        Self {
            provider,
            builder: QueryBuilder::from_config(&config.query),
            renderer: ChartRenderer::new(),
            exporter: Exporter::new(config.output.dir.clone()),
            output: config.output.clone(),
            resolution: Resolution::default(),
            series: None,
            regional: None,
        }
    }

    #[must_use]
    pub fn series(&self) -> Option<&InterestSeries> {
        self.series.as_ref()
    }

    #[must_use]
    pub fn regional(&self) -> Option<&RegionalInterest> {
        self.regional.as_ref()
    }

    #[must_use]
    pub fn keyword(&self) -> &str {
        self.builder.keyword()
    }

    /// Query for a menu choice
    ///
    /// The daily-year choice covers calendar 2024 only, so its file name and
    /// its data describe the same year.
    ///
    /// # Errors
    ///
    /// Propagates query validation errors.
    pub fn query_for(&self, mode: RunMode) -> Result<QuerySpec, QueryError> {
        match mode {
            RunMode::WeeklyMultiYear => self.builder.build_range(2022, 2025, Granularity::Weekly),
            RunMode::DailyYear => self.builder.build_range(2024, 2024, Granularity::Daily),
            RunMode::DailyLast12Months => self.builder.build_recent(12, Granularity::Daily),
        }
    }

    /// Fetch the interest series for `spec`, replacing any held data
    pub async fn fetch_interest_over_time(&mut self, spec: &QuerySpec) -> Option<&InterestSeries> {
        self.series = None;
        self.regional = None;

        let timeframe = spec.timeframe.to_string();
        match spec.granularity {
            Granularity::Daily => println!("{}", t!("session.fetch.daily", timeframe = &timeframe)),
            Granularity::Weekly => {
                println!("{}", t!("session.fetch.weekly", timeframe = &timeframe));
            }
        }

        match self.provider.interest_over_time(spec).await {
            Ok(series) => {
                println!(
                    "{}",
                    t!("session.fetch.success", keyword = &spec.keyword, timeframe = &timeframe)
                );
                println!("{}", t!("session.fetch.shape", rows = series.len()));
                if let (Some(start), Some(end)) = (series.first_date(), series.last_date()) {
                    println!(
                        "{}",
                        t!(
                            "session.fetch.date_range",
                            start = start.format("%Y-%m-%d"),
                            end = end.format("%Y-%m-%d")
                        )
                    );
                }
                self.series = Some(series);
            }
            Err(e) => report_fetch_failure(e),
        }

        self.series.as_ref()
    }

    /// Fetch the regional breakdown for the held series
    ///
    /// Without a held series this warns and returns `None` without any
    /// provider call.
    pub async fn fetch_regional(&mut self) -> Option<&RegionalInterest> {
        self.regional = None;

        let Some(series) = self.series.as_ref() else {
            warn!("Regional data requested before interest over time");
            println!("{}", t!("session.warn.no_series"));
            return None;
        };

        match self.provider.interest_by_region(series, self.resolution).await {
            Ok(regional) => {
                println!("{}", t!("session.regional.success"));
                println!("{}", t!("session.regional.count", count = regional.len()));
                self.regional = Some(regional);
            }
            Err(e) => report_fetch_failure(e),
        }

        self.regional.as_ref()
    }

    /// Print and return summary statistics for the held series
    pub fn summarize(&self) -> Option<InterestSummary> {
        let Some(summary) = self.series.as_ref().and_then(summarize) else {
            warn!("No series to summarize");
            println!("{}", t!("session.warn.no_data_summary"));
            return None;
        };

        println!("{}", summary.report(self.keyword()));
        Some(summary)
    }

    /// Render the interest chart into `file_name`
    pub fn render_interest_chart(&self, file_name: &str) -> Option<PathBuf> {
        let series = self.series.as_ref();
        let Some((series, summary)) = series.and_then(|s| summarize(s).map(|sum| (s, sum))) else {
            println!("{}", t!("session.warn.no_data_plot"));
            return None;
        };

        if !self.output.charts {
            debug!("Charts disabled, skipping interest chart");
            return None;
        }

        let rendered = self.renderer.render_interest_over_time(series, &summary);
        self.save_chart(rendered, file_name)
    }

    /// Render the top-`top_n` regional chart into `file_name`
    pub fn render_regional_chart(&self, top_n: usize, file_name: &str) -> Option<PathBuf> {
        let Some(regional) = self.regional.as_ref().filter(|r| !r.is_empty()) else {
            println!("{}", t!("session.warn.no_regional_plot"));
            return None;
        };

        if !self.output.charts {
            debug!("Charts disabled, skipping regional chart");
            return None;
        }

        let rendered = self.renderer.render_regional(regional, top_n);
        self.save_chart(rendered, file_name)
    }

    fn save_chart(&self, rendered: Result<String, ChartError>, file_name: &str) -> Option<PathBuf> {
        let svg = match rendered {
            Ok(svg) => svg,
            Err(ChartError::NoData) => {
                println!("{}", t!("session.warn.no_data_plot"));
                return None;
            }
            Err(e) => {
                let error = Error::from(e);
                warn!(category = ?error.category(), error = %error, "Chart rendering failed");
                println!("❌ {}", error.localized_desc());
                return None;
            }
        };

        match self.exporter.write_document(&svg, file_name) {
            Ok(path) => {
                println!("{}", t!("session.chart.saved", path = path.display()));
                Some(path)
            }
            Err(e) => {
                let error = Error::from(e);
                warn!(error = %error, "Chart could not be written");
                println!("❌ {}", error.localized_desc());
                None
            }
        }
    }

    /// Print the first `rows` regions
    pub fn print_regional_preview(&self, rows: usize) {
        let Some(regional) = self.regional.as_ref() else {
            return;
        };

        println!("\n{}", t!("session.regional.preview", count = rows));
        let width = regional
            .top(rows)
            .iter()
            .map(|r| r.name.chars().count())
            .max()
            .unwrap_or(0)
            .max(crate::export::REGION_COLUMN.len());

        println!("{:<width$}  {}", crate::export::REGION_COLUMN, regional.keyword());
        for region in regional.top(rows) {
            println!("{:<width$}  {:>3}", region.name, region.score);
        }
    }

    /// Write held data to the export files named for `mode`
    pub fn export(&self, mode: RunMode) -> Vec<PathBuf> {
        let mut written = Vec::new();

        if let Some(series) = self.series.as_ref() {
            let name = mode.series_file_name(self.keyword());
            match self.exporter.write_series(series, &name) {
                Ok(path) => {
                    println!("\n{}", t!("session.export.series", path = path.display()));
                    written.push(path);
                }
                Err(e) => report_export_failure(e),
            }
        }

        if let Some(regional) = self.regional.as_ref() {
            let name = mode.regional_file_name(self.keyword());
            match self.exporter.write_regional(regional, &name) {
                Ok(path) => {
                    println!("{}", t!("session.export.regional", path = path.display()));
                    written.push(path);
                }
                Err(e) => report_export_failure(e),
            }
        }

        written
    }

    /// Run the full cycle for `mode`
    pub async fn run(&mut self, mode: RunMode) -> SessionReport {
        let mut report = SessionReport::default();
        info!(?mode, keyword = %self.keyword(), "Session started");

        let step_key = match mode {
            RunMode::WeeklyMultiYear => "session.step.weekly",
            RunMode::DailyYear => "session.step.daily_year",
            RunMode::DailyLast12Months => "session.step.daily_12m",
        };
        println!("\n{}", t!(step_key));

        let query = match self.query_for(mode) {
            Ok(query) => query,
            Err(e) => {
                let error = Error::from(e);
                warn!(error = %error, "Query rejected");
                println!("❌ {}", error.localized_desc());
                return report;
            }
        };

        let series_file = mode.series_file_name(self.keyword());
        let regional_file = mode.regional_file_name(self.keyword());

        if let Some(series) = self.fetch_interest_over_time(&query).await {
            report.series_rows = series.len();
            report.summary = self.summarize();

            println!("\n{}", t!("session.step.chart"));
            report
                .charts
                .extend(self.render_interest_chart(&chart_file_name(&series_file)));

            println!("\n{}", t!("session.step.regional"));
            if let Some(regional) = self.fetch_regional().await {
                report.regions = regional.len();
                self.print_regional_preview(self.output.preview_rows);

                println!("\n{}", t!("session.step.regional_chart"));
                report.charts.extend(
                    self.render_regional_chart(
                        self.output.regional_top_n,
                        &chart_file_name(&regional_file),
                    ),
                );
            }

            report.exports = self.export(mode);
        }

        println!("\n{}", t!("session.done"));
        info!(
            rows = report.series_rows,
            regions = report.regions,
            exports = report.exports.len(),
            charts = report.charts.len(),
            "Session finished"
        );
        report
    }
}

fn chart_file_name(csv_name: &str) -> String {
    Path::new(csv_name)
        .with_extension("svg")
        .to_string_lossy()
        .into_owned()
}

fn report_fetch_failure(e: FetchError) {
    let error = Error::from(e);
    warn!(
        category = ?error.category(),
        recoverable = error.is_recoverable(),
        error = %error,
        "Fetch failed"
    );
    println!("{}", fetch_failure_message(&error));
}

/// Operator-facing failure text, with a retry hint for transient failures
fn fetch_failure_message(error: &Error) -> String {
    let mut message = format!("❌ {}", error.localized_desc());
    if error.is_recoverable() {
        message.push('\n');
        message.push_str(&t!("session.fetch.retry_hint"));
    }
    message
}

fn report_export_failure(e: crate::utils::error::ExportError) {
    let error = Error::from(e);
    warn!(error = %error, "Export failed");
    println!("❌ {}", error.localized_desc());
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    struct Unreachable;

    #[async_trait]
    impl TrendsProvider for Unreachable {
        async fn interest_over_time(&self, _: &QuerySpec) -> Result<InterestSeries, FetchError> {
            Err(FetchError::Timeout)
        }

        async fn interest_by_region(
            &self,
            _: &InterestSeries,
            _: Resolution,
        ) -> Result<RegionalInterest, FetchError> {
            Err(FetchError::Timeout)
        }
    }

    #[test]
    fn test_timeout_leaves_session_empty() {
        let mut session = TrendsSession::new(Unreachable, &Config::default());
        let spec = session.query_for(RunMode::DailyLast12Months).unwrap();

        let fetched = tokio_test::block_on(session.fetch_interest_over_time(&spec)).is_some();
        assert!(!fetched);
        assert!(session.series().is_none());

        let report = tokio_test::block_on(session.run(RunMode::DailyYear));
        assert_eq!(report.series_rows, 0);
        assert!(report.exports.is_empty());
    }

    #[test]
    fn test_retry_hint_only_for_transient_failures() {
        let hint = t!("session.fetch.retry_hint").to_string();

        let rate_limited = fetch_failure_message(&Error::from(FetchError::RateLimit));
        assert!(rate_limited.ends_with(&hint));

        let empty = fetch_failure_message(&Error::from(FetchError::EmptyResponse));
        assert!(!empty.contains(&hint));
        assert!(empty.starts_with("❌ "));
    }

    #[test]
    fn test_chart_file_name() {
        assert_eq!(
            chart_file_name("turkcell_trends_2024_daily.csv"),
            "turkcell_trends_2024_daily.svg"
        );
        assert_eq!(chart_file_name("regional"), "regional.svg");
    }
}
