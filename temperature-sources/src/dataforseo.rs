//! DataForSEO search volume — illustrative Tier 3 search-interest adapter.
//!
//! Exists to exercise the selector's dual-credential key-gate path (§4.4,
//! §9): both `DATAFORSEO_LOGIN` and `DATAFORSEO_PASSWORD` must be present,
//! combined through the shared Basic-auth helper (§6). Deliberately thin
//! relative to the five Tier 1 adapters — one endpoint, one metric.

use async_trait::async_trait;
use serde_json::{json, Value};

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{http, Tier};
use temperature_types::{DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "dataforseo";
const DISPLAY_NAME: &str = "DataForSEO Search Volume";
const LOGIN_KEY: &str = "DATAFORSEO_LOGIN";
const PASSWORD_KEY: &str = "DATAFORSEO_PASSWORD";

const ENDPOINT: &str = "https://api.dataforseo.com/v3/keywords_data/google_ads/search_volume/live";

/// Illustrative Tier 3 search-interest adapter backed by DataForSEO's
/// Google Ads search-volume endpoint.
pub struct DataForSeo {
    client: reqwest::Client,
}

impl DataForSeo {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    async fn fetch_search_volume(&self, keyword: &str, login: &str, password: &str) -> Result<Vec<DataPoint>, TemperatureError> {
        let auth = http::basic_auth_header(login, password);
        let body = json!([{ "keywords": [keyword], "location_code": 2840, "language_code": "en" }]);

        let data = http::post(&self.client, ENDPOINT, &[("Authorization", auth.as_str())], &body).await?;

        let monthly_searches = data
            .pointer("/tasks/0/result/0/monthly_searches")
            .and_then(Value::as_array)
            .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "response missing monthly_searches"))?;

        let mut datapoints: Vec<DataPoint> = monthly_searches
            .iter()
            .filter_map(|entry| {
                let year = entry.get("year").and_then(Value::as_i64)?;
                let month = entry.get("month").and_then(Value::as_i64)?;
                let volume = entry.get("search_volume").and_then(Value::as_f64)?;
                Some(DataPoint::new(format!("{year:04}-{month:02}"), volume))
            })
            .collect();
        datapoints.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(datapoints)
    }
}

#[async_trait]
impl Source for DataForSeo {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn tier(&self) -> Tier {
        Tier::Three
    }

    fn dimension(&self) -> Dimension {
        Dimension::SearchInterest
    }

    fn is_available(&self, env: &Environment) -> bool {
        env.credential(LOGIN_KEY).is_some() && env.credential(PASSWORD_KEY).is_some()
    }

    fn should_search(&self, _topic: &str) -> bool {
        true
    }

    async fn search(&self, topic: &str, _window_days: u32, ctx: &SearchContext) -> Result<Vec<Signal>, TemperatureError> {
        let (Some(login), Some(password)) = (ctx.credential(LOGIN_KEY), ctx.credential(PASSWORD_KEY)) else {
            return Ok(vec![]);
        };
        let Some(keyword) = topic_variants(topic).into_iter().next() else {
            return Ok(vec![]);
        };

        let datapoints = self.fetch_search_volume(&keyword, login, password).await?;
        if datapoints.is_empty() {
            return Ok(vec![]);
        }

        let signal = Signal::from_datapoints(SOURCE_NAME, "search_volume", "searches/month", Dimension::SearchInterest, datapoints)
            .with_metadata("keyword", keyword);
        Ok(vec![signal])
    }
}
