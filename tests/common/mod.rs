//! Common test utilities

#![allow(dead_code)]

use chrono::NaiveDate;
use serde_json::json;
use trendlens::config::{Config, ProviderConfig};
use trendlens::models::{
    Granularity, InterestPoint, InterestSeries, QuerySpec, RegionScore, RegionalInterest, Timeframe,
};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// 2024-01-01T00:00:00Z
pub const JAN_1_2024: i64 = 1_704_067_200;

pub const EXPLORE_PATH: &str = "/trends/api/explore";
pub const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
pub const COMPARED_GEO_PATH: &str = "/trends/api/widgetdata/comparedgeo";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Daily query for the last 12 months of "turkcell" in TR
pub fn create_test_spec() -> QuerySpec {
    QuerySpec {
        keyword: "turkcell".to_string(),
        timeframe: Timeframe::RecentMonths(12),
        geo: "TR".to_string(),
        category: 0,
        property: String::new(),
        granularity: Granularity::Daily,
    }
}

/// Daily series starting 2024-01-01 with the given scores
pub fn create_test_series(scores: &[u8]) -> InterestSeries {
    let start = date(2024, 1, 1);
    InterestSeries::new(
        create_test_spec(),
        scores
            .iter()
            .enumerate()
            .map(|(i, s)| InterestPoint::new(start + chrono::Duration::days(i as i64), *s)),
    )
}

pub fn create_test_regional(rows: &[(&str, u8)]) -> RegionalInterest {
    RegionalInterest::new(
        "turkcell",
        rows.iter().map(|(name, score)| RegionScore::new(*name, *score)),
    )
}

/// Provider settings pointed at a mock server, no retries
pub fn provider_config(base_url: &str) -> ProviderConfig {
    ProviderConfig {
        base_url: base_url.to_string(),
        rate_limit: 100,
        request_timeout_secs: 5,
        retry_base_delay_ms: 10,
        ..Config::default().provider
    }
}

/// Explore body with both widgets, XSSI prefixed like the real endpoint
pub fn explore_body() -> String {
    let body = json!({
        "widgets": [
            {
                "id": "TIMESERIES",
                "token": "ts-token",
                "request": { "time": "today 12-m", "resolution": "DAY" }
            },
            {
                "id": "GEO_MAP",
                "token": "geo-token",
                "request": { "geo": { "country": "TR" } }
            }
        ]
    });
    format!(")]}}',\n{body}")
}

/// Multiline body with one row per `(day offset from 2024-01-01, value, partial)`
pub fn multiline_body(rows: &[(i64, i64, bool)]) -> String {
    let data: Vec<_> = rows
        .iter()
        .map(|(day, value, partial)| {
            let mut row = json!({
                "time": (JAN_1_2024 + day * 86_400).to_string(),
                "formattedTime": "",
                "value": [value],
                "hasData": [true],
            });
            if *partial {
                row["isPartial"] = json!(true);
            }
            row
        })
        .collect();

    format!(")]}}'\n{}", json!({ "default": { "timelineData": data } }))
}

/// Comparedgeo body, rows in the given order
pub fn geo_body(rows: &[(&str, i64)]) -> String {
    let data: Vec<_> = rows
        .iter()
        .map(|(name, value)| json!({ "geoName": name, "geoCode": "TR-XX", "value": [value] }))
        .collect();

    format!(")]}}'\n{}", json!({ "default": { "geoMapData": data } }))
}

/// Landing page and explore endpoint
pub async fn mount_explore(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html></html>"))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path(EXPLORE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_string(explore_body()))
        .mount(server)
        .await;
}
