//! Wire types for the provider's web API
//!
//! Only the fields the session consumes are modelled; everything else in
//! the responses is ignored.

use serde::Deserialize;
use serde_json::{json, Value};

use crate::models::QuerySpec;

/// Widget id carrying the time series
pub const TIMESERIES_WIDGET: &str = "TIMESERIES";

/// Widget id carrying the regional breakdown
pub const GEO_MAP_WIDGET: &str = "GEO_MAP";

/// Response of the explore endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ExploreResponse {
    #[serde(default)]
    pub widgets: Vec<Widget>,
}

/// One data view offered by the explore endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct Widget {
    pub id: String,

    #[serde(default)]
    pub token: String,

    /// Opaque request payload echoed back to the widget endpoints
    #[serde(default)]
    pub request: Value,
}

impl ExploreResponse {
    /// First widget with the given id
    #[must_use]
    pub fn widget(&self, id: &str) -> Option<&Widget> {
        self.widgets.iter().find(|w| w.id == id)
    }
}

/// Response of the multiline (time series) endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct MultilineResponse {
    pub default: TimelineBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineBody {
    #[serde(default)]
    pub timeline_data: Vec<TimelineRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineRow {
    /// Period start as unix seconds
    pub time: String,

    /// One value per compared keyword
    #[serde(default)]
    pub value: Vec<i64>,

    /// Set on the latest, still incomplete period
    #[serde(default)]
    pub is_partial: bool,
}

/// Response of the comparedgeo (regional) endpoint
#[derive(Debug, Clone, Deserialize)]
pub struct ComparedGeoResponse {
    pub default: GeoBody,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoBody {
    #[serde(default)]
    pub geo_map_data: Vec<GeoRow>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeoRow {
    pub geo_name: String,

    #[serde(default)]
    pub geo_code: Option<String>,

    #[serde(default)]
    pub value: Vec<i64>,
}

/// Explore request payload for a query
#[must_use]
pub fn explore_request(spec: &QuerySpec) -> Value {
    json!({
        "comparisonItem": [{
            "keyword": spec.keyword,
            "time": spec.timeframe.to_string(),
            "geo": spec.geo,
        }],
        "category": spec.category,
        "property": spec.property,
    })
}

/// First value of a row, clamped into the score range
#[must_use]
pub fn score_of(values: &[i64]) -> u8 {
    values.first().map_or(0, |v| (*v).clamp(0, 100) as u8)
}
