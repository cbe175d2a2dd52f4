//! Alpha Vantage quote — illustrative Tier 2 financial adapter.
//!
//! Exists to exercise the selector's single-credential key-gate path end to
//! end (§4.4, §9), not to be an exhaustively correct wire client. Maps a
//! daily closing-price time series onto the same `current_value`/
//! `period_avg` shape every other adapter uses.

use async_trait::async_trait;
use serde_json::Value;

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{http, Tier};
use temperature_types::{DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "alpha_vantage";
const DISPLAY_NAME: &str = "Alpha Vantage Quote";
const CREDENTIAL_KEY: &str = "ALPHA_VANTAGE_KEY";

/// Ticker-like topics: short, all-uppercase-alpha. Keeps quota spend off
/// prose topics that would never resolve to a symbol anyway.
const MAX_TICKER_LEN: usize = 5;

/// Illustrative Tier 2 financial adapter backed by Alpha Vantage's daily
/// time series endpoint.
pub struct AlphaVantage {
    client: reqwest::Client,
}

impl AlphaVantage {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    async fn fetch_daily_series(&self, symbol: &str, api_key: &str) -> Result<Vec<DataPoint>, TemperatureError> {
        let mut url = url::Url::parse("https://www.alphavantage.co/query").expect("static base url");
        url.query_pairs_mut()
            .append_pair("function", "TIME_SERIES_DAILY")
            .append_pair("symbol", symbol)
            .append_pair("apikey", api_key);

        let data = http::get(&self.client, url.as_str(), &[]).await?;

        let series = data
            .get("Time Series (Daily)")
            .and_then(Value::as_object)
            .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "response missing daily time series"))?;

        let mut datapoints: Vec<DataPoint> = series
            .iter()
            .filter_map(|(date, entry)| {
                let close = entry.get("4. close").and_then(Value::as_str)?.parse::<f64>().ok()?;
                Some(DataPoint::new(date.clone(), close))
            })
            .collect();
        datapoints.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));
        Ok(datapoints)
    }
}

/// `true` iff `topic` looks like a ticker: short, non-empty, all uppercase
/// ASCII alphabetic characters.
#[must_use]
fn looks_like_ticker(topic: &str) -> bool {
    let trimmed = topic.trim();
    !trimmed.is_empty()
        && trimmed.len() <= MAX_TICKER_LEN
        && trimmed.chars().all(|c| c.is_ascii_alphabetic() && c.is_uppercase())
}

#[async_trait]
impl Source for AlphaVantage {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn tier(&self) -> Tier {
        Tier::Two
    }

    fn dimension(&self) -> Dimension {
        Dimension::Financial
    }

    fn is_available(&self, env: &Environment) -> bool {
        env.credential(CREDENTIAL_KEY).is_some()
    }

    fn should_search(&self, topic: &str) -> bool {
        topic_variants(topic).iter().any(|v| looks_like_ticker(v))
    }

    async fn search(&self, topic: &str, window_days: u32, ctx: &SearchContext) -> Result<Vec<Signal>, TemperatureError> {
        let Some(api_key) = ctx.credential(CREDENTIAL_KEY) else {
            return Ok(vec![]);
        };
        let Some(symbol) = topic_variants(topic).into_iter().find(|v| looks_like_ticker(v)) else {
            return Ok(vec![]);
        };

        let mut datapoints = self.fetch_daily_series(&symbol, api_key).await?;
        if datapoints.is_empty() {
            return Ok(vec![]);
        }

        let cutoff_count = datapoints.len().saturating_sub(window_days as usize);
        datapoints.drain(..cutoff_count);

        let signal = Signal::from_datapoints(SOURCE_NAME, "close_price", "usd", Dimension::Financial, datapoints)
            .with_metadata("symbol", symbol);
        Ok(vec![signal])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_uppercase_topics_look_like_tickers() {
        assert!(looks_like_ticker("AAPL"));
        assert!(looks_like_ticker("NVDA"));
    }

    #[test]
    fn prose_topics_are_rejected() {
        assert!(!looks_like_ticker("rust programming language"));
        assert!(!looks_like_ticker("toolong"));
        assert!(!looks_like_ticker("aapl"));
    }
}
