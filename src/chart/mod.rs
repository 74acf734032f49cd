//! Chart rendering
//!
//! Draws the interest line chart and the regional bar chart as SVG
//! documents with plotters. Rendering never touches the filesystem; the
//! session decides where documents go.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::analytics::InterestSummary;
use crate::models::{InterestSeries, RegionalInterest};
use crate::utils::{error::ChartError, truncate_text};

/// Line colour of the interest chart
pub const BRAND_RED: RGBColor = RGBColor(0xe3, 0x1e, 0x24);

const FONT: &str = "sans-serif";

/// Lightest and darkest bar colours
const SHADE_LIGHT: (u8, u8, u8) = (252, 146, 114);
const SHADE_DARK: (u8, u8, u8) = (165, 15, 21);

fn draw_err<E: std::fmt::Display>(e: E) -> ChartError {
    ChartError::Draw(e.to_string())
}

/// Red shade for bar `index` out of `count`, lightest first
fn bar_shade(index: usize, count: usize) -> RGBColor {
    let t = if count <= 1 {
        0.0
    } else {
        index as f64 / (count - 1) as f64
    };
    let mix = |from: u8, to: u8| -> u8 {
        (f64::from(from) + (f64::from(to) - f64::from(from)) * t).round() as u8
    };

    RGBColor(
        mix(SHADE_LIGHT.0, SHADE_DARK.0),
        mix(SHADE_LIGHT.1, SHADE_DARK.1),
        mix(SHADE_LIGHT.2, SHADE_DARK.2),
    )
}

/// Renders session charts
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    line_size: (u32, u32),
    bar_size: (u32, u32),
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            line_size: (1200, 600),
            bar_size: (1200, 800),
        }
    }
}

impl ChartRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Line chart of score over time with max/min/mean annotation
    ///
    /// # Errors
    ///
    /// `ChartError::NoData` for an empty series, `ChartError::Draw` when the
    /// backend fails.
    pub fn render_interest_over_time(
        &self,
        series: &InterestSeries,
        summary: &InterestSummary,
    ) -> Result<String, ChartError> {
        let (Some(first), Some(last)) = (series.first_date(), series.last_date()) else {
            return Err(ChartError::NoData);
        };
        let span = (last - first).num_days().max(1);

        let title = crate::i18n::t!("chart.line_title", keyword = series.keyword(), geo = &series.spec().geo)
            .to_string();
        let x_desc = crate::i18n::t!("chart.date_axis").to_string();
        let y_desc = crate::i18n::t!("chart.interest_axis").to_string();
        let annotation = [
            crate::i18n::t!(
                "chart.annotation_max",
                value = summary.max,
                date = summary.max_date.format("%Y-%m-%d")
            )
            .to_string(),
            crate::i18n::t!("chart.annotation_min", value = summary.min).to_string(),
            crate::i18n::t!("chart.annotation_mean", value = format!("{:.1}", summary.mean))
                .to_string(),
        ];

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.line_size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&title, (FONT, 24))
                .margin(20)
                .x_label_area_size(60)
                .y_label_area_size(60)
                .build_cartesian_2d(0i64..span, 0f64..105f64)
                .map_err(draw_err)?;

            let date_label = |offset: &i64| {
                (first + chrono::Duration::days(*offset))
                    .format("%Y-%m-%d")
                    .to_string()
            };

            chart
                .configure_mesh()
                .x_desc(x_desc)
                .y_desc(y_desc)
                .x_labels(10)
                .x_label_formatter(&date_label)
                .light_line_style(BLACK.mix(0.05))
                .draw()
                .map_err(draw_err)?;

            chart
                .draw_series(LineSeries::new(
                    series
                        .points()
                        .iter()
                        .map(|p| ((p.date - first).num_days(), f64::from(p.score))),
                    BRAND_RED.stroke_width(2),
                ))
                .map_err(draw_err)?;

            // annotation box in the top-left corner of the plotting area
            let (x0, y0) = chart.backend_coord(&(0, 100.0));
            let (x0, y0) = (x0 + 12, y0 + 8);
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + 280, y0 + 78)],
                WHITE.mix(0.8).filled(),
            ))
            .map_err(draw_err)?;
            root.draw(&Rectangle::new(
                [(x0, y0), (x0 + 280, y0 + 78)],
                BLACK.mix(0.3).stroke_width(1),
            ))
            .map_err(draw_err)?;

            for (i, line) in annotation.iter().enumerate() {
                root.draw(&Text::new(
                    line.clone(),
                    (x0 + 10, y0 + 10 + 22 * i as i32),
                    (FONT, 15),
                ))
                .map_err(draw_err)?;
            }

            root.present().map_err(draw_err)?;
        }

        Ok(svg)
    }

    /// Horizontal bar chart of the `top_n` highest-scoring regions
    ///
    /// # Errors
    ///
    /// `ChartError::NoData` when there are no regions or `top_n` is 0,
    /// `ChartError::Draw` when the backend fails.
    pub fn render_regional(
        &self,
        regional: &RegionalInterest,
        top_n: usize,
    ) -> Result<String, ChartError> {
        let top = regional.top(top_n);
        if top.is_empty() {
            return Err(ChartError::NoData);
        }
        let count = top.len();

        let title = crate::i18n::t!(
            "chart.bar_title",
            keyword = regional.keyword(),
            count = count
        )
        .to_string();
        let x_desc = crate::i18n::t!("chart.interest_axis").to_string();

        let mut svg = String::new();
        {
            let root = SVGBackend::with_string(&mut svg, self.bar_size).into_drawing_area();
            root.fill(&WHITE).map_err(draw_err)?;

            let mut chart = ChartBuilder::on(&root)
                .caption(&title, (FONT, 24))
                .margin(20)
                .x_label_area_size(50)
                .y_label_area_size(180)
                .build_cartesian_2d(0f64..110f64, 0f64..count as f64)
                .map_err(draw_err)?;

            chart
                .configure_mesh()
                .disable_y_mesh()
                .y_label_formatter(&|_: &f64| String::new())
                .x_desc(x_desc)
                .light_line_style(BLACK.mix(0.05))
                .draw()
                .map_err(draw_err)?;

            // rank 0 at the top
            let band = |rank: usize| -> (f64, f64) {
                let top_edge = (count - rank) as f64;
                (top_edge - 0.85, top_edge - 0.15)
            };

            chart
                .draw_series(top.iter().enumerate().map(|(rank, region)| {
                    let (low, high) = band(rank);
                    Rectangle::new(
                        [(0.0, low), (f64::from(region.score), high)],
                        bar_shade(rank, count).filled(),
                    )
                }))
                .map_err(draw_err)?;

            let value_style = TextStyle::from((FONT, 14).into_font())
                .pos(Pos::new(HPos::Left, VPos::Center));
            chart
                .draw_series(top.iter().enumerate().map(|(rank, region)| {
                    let (low, high) = band(rank);
                    Text::new(
                        region.score.to_string(),
                        (f64::from(region.score) + 1.0, (low + high) / 2.0),
                        value_style.clone(),
                    )
                }))
                .map_err(draw_err)?;

            let name_style = TextStyle::from((FONT, 14).into_font())
                .pos(Pos::new(HPos::Right, VPos::Center));
            for (rank, region) in top.iter().enumerate() {
                let (low, high) = band(rank);
                let (x, y) = chart.backend_coord(&(0.0, (low + high) / 2.0));
                root.draw(&Text::new(
                    truncate_text(&region.name, 24),
                    (x - 8, y),
                    name_style.clone(),
                ))
                .map_err(draw_err)?;
            }

            root.present().map_err(draw_err)?;
        }

        Ok(svg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::summarize;
    use crate::models::{
        Granularity, InterestPoint, QuerySpec, RegionScore, Timeframe,
    };
    use chrono::NaiveDate;

    fn spec() -> QuerySpec {
        QuerySpec {
            keyword: "turkcell".into(),
            timeframe: Timeframe::RecentMonths(12),
            geo: "TR".into(),
            category: 0,
            property: String::new(),
            granularity: Granularity::Weekly,
        }
    }

    fn series(scores: &[u8]) -> InterestSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 7).unwrap();
        InterestSeries::new(
            spec(),
            scores
                .iter()
                .enumerate()
                .map(|(i, s)| InterestPoint::new(start + chrono::Duration::weeks(i as i64), *s)),
        )
    }

    #[test]
    fn test_line_chart_contains_annotation() {
        crate::i18n::set_locale("en");
        let series = series(&[40, 55, 100, 70, 62]);
        let summary = summarize(&series).unwrap();

        let svg = ChartRenderer::new()
            .render_interest_over_time(&series, &summary)
            .unwrap();

        assert!(svg.contains("<svg"));
        assert!(svg.contains("<polyline") || svg.contains("<path"));
        assert!(svg.contains("2024-01-21"), "max date should be annotated");
        assert!(svg.contains("65.4"), "mean should be annotated");
    }

    #[test]
    fn test_single_point_line_chart() {
        let series = series(&[50]);
        let summary = summarize(&series).unwrap();
        assert!(ChartRenderer::new()
            .render_interest_over_time(&series, &summary)
            .is_ok());
    }

    #[test]
    fn test_empty_series_is_no_data() {
        let full = series(&[1, 2]);
        let summary = summarize(&full).unwrap();
        let empty = series(&[]);

        let err = ChartRenderer::new()
            .render_interest_over_time(&empty, &summary)
            .unwrap_err();
        assert!(matches!(err, ChartError::NoData));
    }

    #[test]
    fn test_bar_chart_limits_regions() {
        let regional = RegionalInterest::new(
            "turkcell",
            vec![
                RegionScore::new("Istanbul", 100),
                RegionScore::new("Ankara", 87),
                RegionScore::new("Izmir", 75),
            ],
        );

        let svg = ChartRenderer::new().render_regional(&regional, 2).unwrap();
        assert!(svg.contains("Istanbul"));
        assert!(svg.contains("Ankara"));
        assert!(!svg.contains("Izmir"));
        // text content is written on its own line
        assert!(svg.lines().any(|line| line.trim() == "87"));
    }

    #[test]
    fn test_empty_regional_is_no_data() {
        let regional = RegionalInterest::new("turkcell", Vec::new());
        let err = ChartRenderer::new()
            .render_regional(&regional, 15)
            .unwrap_err();
        assert!(matches!(err, ChartError::NoData));
    }

    #[test]
    fn test_bar_shades_lightest_first() {
        let first = bar_shade(0, 5);
        let last = bar_shade(4, 5);
        assert_eq!((first.0, first.1, first.2), SHADE_LIGHT);
        assert_eq!((last.0, last.1, last.2), SHADE_DARK);
        assert_eq!(bar_shade(0, 1).0, SHADE_LIGHT.0);
    }
}
