//! HTTP client for the trends web API
//!
//! Features:
//! - Cookie persistence (the provider rejects cookieless clients with 429)
//! - Rate limiting with governor
//! - Optional retry with exponential backoff on 429/5xx
//! - Anti-XSSI prefix stripping before JSON decoding
//! - Explore widgets cached per query so the regional request reuses them

use async_trait::async_trait;
use governor::{
    clock::DefaultClock,
    state::{InMemoryState, NotKeyed},
    Quota, RateLimiter,
};
use rand::seq::SliceRandom;
use reqwest::{
    header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, USER_AGENT},
    Client,
};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use std::num::NonZeroU32;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tracing::{debug, info, warn};

use super::payload::{
    explore_request, score_of, ComparedGeoResponse, ExploreResponse, MultilineResponse, Widget,
    GEO_MAP_WIDGET, TIMESERIES_WIDGET,
};
use super::{Resolution, TrendsProvider};
use crate::config::ProviderConfig;
use crate::models::{InterestPoint, InterestSeries, QuerySpec, RegionScore, RegionalInterest};
use crate::utils::{date_from_unix, error::FetchError, strip_xssi_prefix};

const EXPLORE_PATH: &str = "/trends/api/explore";
const MULTILINE_PATH: &str = "/trends/api/widgetdata/multiline";
const COMPARED_GEO_PATH: &str = "/trends/api/widgetdata/comparedgeo";

/// Ceiling for a single backoff delay in milliseconds
pub const MAX_BACKOFF_MS: u64 = 30_000;

/// Pool of realistic User-Agent strings for rotation
const USER_AGENTS: &[&str] = &[
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36",
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:121.0) Gecko/20100101 Firefox/121.0",
    "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/17.2 Safari/605.1.15",
];

/// Trends web API client
pub struct TrendsClient {
    /// HTTP client with timeout, compression and cookie store
    client: Client,

    /// Rate limiter to control request frequency
    rate_limiter: RateLimiter<NotKeyed, InMemoryState, DefaultClock>,

    base_url: String,
    host_language: String,
    tz_offset: i32,

    /// Maximum number of retry attempts for failed requests
    max_retries: u32,

    /// Base delay in milliseconds for exponential backoff
    base_delay_ms: u64,

    /// Fixed user agent, rotated from the pool when unset
    user_agent: Option<String>,

    cookies_primed: AtomicBool,

    /// Widgets of the most recent explore call
    last_explore: Mutex<Option<(QuerySpec, ExploreResponse)>>,
}

impl TrendsClient {
    /// Create a client from provider settings
    ///
    /// # Errors
    ///
    /// Returns `FetchError::Http` if the HTTP client cannot be created
    pub fn new(config: &ProviderConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .gzip(true)
            .cookie_store(true)
            .build()?;

        let rate = NonZeroU32::new(config.rate_limit).unwrap_or(NonZeroU32::MIN);
        let rate_limiter = RateLimiter::direct(Quota::per_second(rate));

        Ok(Self {
            client,
            rate_limiter,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            host_language: config.host_language.clone(),
            tz_offset: config.tz_offset,
            max_retries: config.max_retries,
            base_delay_ms: config.retry_base_delay_ms,
            user_agent: config.user_agent.clone(),
            cookies_primed: AtomicBool::new(false),
            last_explore: Mutex::new(None),
        })
    }

    /// Base URL requests are sent to
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Visit the landing page once so the cookie store holds a session cookie
    async fn prime_cookies(&self, geo: &str) {
        if self.cookies_primed.swap(true, Ordering::SeqCst) {
            return;
        }

        let url = format!("{}/", self.base_url);
        self.rate_limiter.until_ready().await;
        match self
            .client
            .get(&url)
            .query(&[("geo", geo)])
            .headers(self.build_headers())
            .send()
            .await
        {
            Ok(response) => debug!(status = %response.status(), "Cookie priming request done"),
            Err(e) => debug!(error = %e, "Cookie priming request failed, continuing"),
        }
    }

    /// Explore widgets for `spec`, reusing the last response for the same query
    async fn explore(&self, spec: &QuerySpec) -> Result<ExploreResponse, FetchError> {
        if let Some(cached) = self.cached_explore(spec) {
            debug!(keyword = %spec.keyword, "Reusing explore widgets");
            return Ok(cached);
        }

        self.prime_cookies(&spec.geo).await;

        let request = explore_request(spec).to_string();
        let explore: ExploreResponse = self
            .get_json(EXPLORE_PATH, &[("req", request)])
            .await?;

        debug!(widgets = explore.widgets.len(), "Explore response received");

        if let Ok(mut last) = self.last_explore.lock() {
            *last = Some((spec.clone(), explore.clone()));
        }

        Ok(explore)
    }

    fn cached_explore(&self, spec: &QuerySpec) -> Option<ExploreResponse> {
        let last = self.last_explore.lock().ok()?;
        match last.as_ref() {
            Some((cached_spec, explore)) if cached_spec == spec => Some(explore.clone()),
            _ => None,
        }
    }

    async fn widget_data<T: DeserializeOwned>(
        &self,
        path: &str,
        widget: &Widget,
        request: &Value,
    ) -> Result<T, FetchError> {
        self.get_json(
            path,
            &[("req", request.to_string()), ("token", widget.token.clone())],
        )
        .await
    }

    /// GET `path` with the common locale parameters and decode the JSON body
    async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, FetchError> {
        let body = self.get_with_retry(path, params).await?;
        serde_json::from_str(strip_xssi_prefix(&body))
            .map_err(|e| FetchError::Malformed(format!("{path}: {e}")))
    }

    /// GET with rate limiting and exponential backoff retry logic
    ///
    /// # Errors
    ///
    /// With retries disabled the last failure is returned as is, otherwise
    /// `FetchError::MaxRetriesExceeded` once all attempts fail.
    async fn get_with_retry(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<String, FetchError> {
        let url = format!("{}{path}", self.base_url);
        let mut query: Vec<(&str, String)> = vec![
            ("hl", self.host_language.clone()),
            ("tz", self.tz_offset.to_string()),
        ];
        query.extend(params.iter().cloned());

        let mut last_error = None;

        for attempt in 0..=self.max_retries {
            if attempt > 0 {
                let delay = backoff_delay(self.base_delay_ms, attempt);
                warn!(attempt, delay_ms = delay.as_millis() as u64, path, "Retrying provider request");
                tokio::time::sleep(delay).await;
            }

            self.rate_limiter.until_ready().await;

            match self
                .client
                .get(&url)
                .query(&query)
                .headers(self.build_headers())
                .send()
                .await
            {
                Ok(response) => {
                    let status = response.status();

                    if status.is_success() {
                        return Ok(response.text().await?);
                    }

                    let error = if status.as_u16() == 429 {
                        FetchError::RateLimit
                    } else {
                        FetchError::Status(status.as_u16())
                    };

                    if Self::should_retry(status.as_u16()) {
                        last_error = Some(error);
                        continue;
                    }
                    return Err(error);
                }
                Err(e) if e.is_timeout() => last_error = Some(FetchError::Timeout),
                Err(e) => last_error = Some(FetchError::Http(e)),
            }
        }

        match last_error {
            Some(error) if self.max_retries == 0 => Err(error),
            _ => Err(FetchError::MaxRetriesExceeded),
        }
    }

    /// Determine if a status code should trigger a retry
    ///
    /// Retry on 429, 500, 502, 503 and 504; everything else is final.
    fn should_retry(status: u16) -> bool {
        matches!(status, 429 | 500 | 502 | 503 | 504)
    }

    /// Build browser-like headers
    fn build_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();

        let agent = self
            .user_agent
            .as_deref()
            .and_then(|ua| HeaderValue::from_str(ua).ok())
            .unwrap_or_else(|| HeaderValue::from_static(Self::random_user_agent()));
        headers.insert(USER_AGENT, agent);

        headers.insert(
            ACCEPT,
            HeaderValue::from_static("application/json, text/plain, */*"),
        );

        if let Ok(language) = HeaderValue::from_str(&self.host_language) {
            headers.insert(ACCEPT_LANGUAGE, language);
        }

        headers
    }

    /// Get a random user agent from the pool
    fn random_user_agent() -> &'static str {
        let mut rng = rand::thread_rng();
        USER_AGENTS.choose(&mut rng).copied().unwrap_or(USER_AGENTS[0])
    }
}

/// Exponential backoff before retry `attempt` (1-based), capped at [`MAX_BACKOFF_MS`]
fn backoff_delay(base_delay_ms: u64, attempt: u32) -> Duration {
    let factor = 2_u64
        .checked_pow(attempt.saturating_sub(1))
        .unwrap_or(u64::MAX);
    Duration::from_millis(base_delay_ms.saturating_mul(factor).min(MAX_BACKOFF_MS))
}

#[async_trait]
impl TrendsProvider for TrendsClient {
    async fn interest_over_time(&self, spec: &QuerySpec) -> Result<InterestSeries, FetchError> {
        info!(keyword = %spec.keyword, timeframe = %spec.timeframe, geo = %spec.geo, "Fetching interest over time");

        let explore = self.explore(spec).await?;
        let widget = explore
            .widget(TIMESERIES_WIDGET)
            .ok_or(FetchError::MissingWidget(TIMESERIES_WIDGET))?;

        let response: MultilineResponse = self
            .widget_data(MULTILINE_PATH, widget, &widget.request)
            .await?;
        let rows = response.default.timeline_data;

        if rows.is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        let partial = rows.iter().filter(|r| r.is_partial).count();
        if partial > 0 {
            debug!(partial, "Dropping partial-period indicator");
        }

        let points = rows
            .iter()
            .map(|row| {
                let date = date_from_unix(&row.time)
                    .map_err(|e| FetchError::Malformed(e.to_string()))?;
                Ok(InterestPoint::new(date, score_of(&row.value)))
            })
            .collect::<Result<Vec<_>, FetchError>>()?;

        let series = InterestSeries::new(spec.clone(), points);
        info!(rows = series.len(), "Interest over time fetched");
        Ok(series)
    }

    async fn interest_by_region(
        &self,
        series: &InterestSeries,
        resolution: Resolution,
    ) -> Result<RegionalInterest, FetchError> {
        if series.is_empty() {
            return Err(FetchError::MissingSeries);
        }

        let spec = series.spec();
        info!(keyword = %spec.keyword, %resolution, "Fetching interest by region");

        let explore = self.explore(spec).await?;
        let widget = explore
            .widget(GEO_MAP_WIDGET)
            .ok_or(FetchError::MissingWidget(GEO_MAP_WIDGET))?;

        let mut request = widget.request.clone();
        let fields = request
            .as_object_mut()
            .ok_or_else(|| FetchError::Malformed("GEO_MAP request is not an object".into()))?;
        fields.insert("resolution".into(), json!(resolution.as_str()));
        fields.insert("includeLowSearchVolumeGeos".into(), json!(true));

        let response: ComparedGeoResponse = self
            .widget_data(COMPARED_GEO_PATH, widget, &request)
            .await?;
        let rows = response.default.geo_map_data;

        if rows.is_empty() {
            return Err(FetchError::EmptyResponse);
        }

        let regional = RegionalInterest::new(
            spec.keyword.clone(),
            rows.iter()
                .map(|row| RegionScore::new(row.geo_name.clone(), score_of(&row.value))),
        );
        info!(regions = regional.len(), "Interest by region fetched");
        Ok(regional)
    }
}
