//! GDELT News — volume and sentiment timelines from the GDELT DOC 2.0 API.
//!
//! The only multi-signal Tier 1 adapter: one call fans out into a
//! `news_volume` signal (media) and a `news_sentiment` signal (the
//! `sentiment` pseudo-dimension, folded into `media` at aggregation time).
//! A timeline fetch failure is swallowed per-metric, not propagated; only
//! losing both metrics counts as "no data".

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{http, Tier};
use temperature_types::{Confidence, DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "gdelt";
const DISPLAY_NAME: &str = "GDELT News";

/// GDELT's rolling timeline API tops out around three months.
const MAX_WINDOW_DAYS: u32 = 90;

/// News-volume and sentiment adapter backed by the GDELT DOC 2.0 API.
pub struct Gdelt {
    client: reqwest::Client,
}

impl Gdelt {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    async fn fetch_timeline(&self, query: &str, mode: &str, timespan: &str) -> Vec<DataPoint> {
        let encoded = url::form_urlencoded::byte_serialize(query.as_bytes()).collect::<String>();
        let url = format!(
            "https://api.gdeltproject.org/api/v2/doc/doc?query={encoded}&mode={mode}&format=json&timespan={timespan}"
        );

        // A timeline fetch failure is "no data for this metric", not a
        // propagated error — only losing both metrics empties the adapter.
        let Ok(data) = http::get(&self.client, &url, &[]).await else {
            return vec![];
        };

        let Some(series) = data.pointer("/timeline/0/data").and_then(Value::as_array) else {
            return vec![];
        };
        if series.is_empty() {
            return vec![];
        }

        aggregate_by_date(series, mode == "timelinetone")
    }
}

/// Group sub-daily GDELT entries by their `YYYY-MM-DD` date prefix,
/// summing volume entries and averaging tone entries, sorted ascending.
fn aggregate_by_date(entries: &[Value], average: bool) -> Vec<DataPoint> {
    let mut by_date: BTreeMap<String, Vec<f64>> = BTreeMap::new();

    for entry in entries {
        let Some(date_field) = entry.get("date").and_then(Value::as_str) else {
            continue;
        };
        if date_field.len() < 10 {
            continue;
        }
        let date = date_field[..10].to_string();
        let value = entry.get("value").and_then(Value::as_f64).unwrap_or(0.0);
        by_date.entry(date).or_default().push(value);
    }

    by_date
        .into_iter()
        .map(|(date, values)| {
            let count = values.len();
            let aggregated = if average {
                values.iter().sum::<f64>() / count as f64
            } else {
                values.iter().sum::<f64>()
            };
            let mut raw = serde_json::Map::new();
            raw.insert("entries".to_string(), Value::from(count));
            DataPoint::with_raw(date, aggregated, raw)
        })
        .collect()
}

#[async_trait]
impl Source for Gdelt {
    fn name(&self) -> &'static str {
        SOURCE_NAME
    }

    fn display_name(&self) -> &'static str {
        DISPLAY_NAME
    }

    fn tier(&self) -> Tier {
        Tier::One
    }

    fn dimension(&self) -> Dimension {
        Dimension::Media
    }

    fn is_available(&self, _env: &Environment) -> bool {
        true
    }

    fn should_search(&self, _topic: &str) -> bool {
        true
    }

    async fn search(&self, topic: &str, window_days: u32, _ctx: &SearchContext) -> Result<Vec<Signal>, TemperatureError> {
        let query = topic_variants(topic).into_iter().next().unwrap_or_default();
        if query.is_empty() {
            return Ok(vec![]);
        }

        let timespan = format!("{}d", window_days.min(MAX_WINDOW_DAYS));

        let volume_dps = self.fetch_timeline(&query, "timelinevolraw", &timespan).await;
        let tone_dps = self.fetch_timeline(&query, "timelinetone", &timespan).await;

        let mut signals = Vec::with_capacity(2);
        if !volume_dps.is_empty() {
            signals.push(Signal::from_datapoints(
                SOURCE_NAME,
                "news_volume",
                "articles/day",
                Dimension::Media,
                volume_dps,
            ));
        }
        if !tone_dps.is_empty() {
            signals.push(
                Signal::from_datapoints(SOURCE_NAME, "news_sentiment", "tone_score", Dimension::Sentiment, tone_dps)
                    .with_confidence(Confidence::Medium),
            );
        }

        Ok(signals)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn volume_entries_are_summed_per_day() {
        let entries = serde_json::json!([
            {"date": "20260101T000000Z", "value": 3},
            {"date": "20260101T120000Z", "value": 4},
            {"date": "20260102T000000Z", "value": 1},
        ]);
        let points = aggregate_by_date(entries.as_array().unwrap(), false);
        assert_eq!(points.len(), 2);
        assert_eq!(points[0].timestamp, "2026-01-01");
        assert_eq!(points[0].value, 7.0);
        assert_eq!(points[1].value, 1.0);
    }

    #[test]
    fn tone_entries_are_averaged_per_day() {
        let entries = serde_json::json!([
            {"date": "20260101T000000Z", "value": 2.0},
            {"date": "20260101T120000Z", "value": 4.0},
        ]);
        let points = aggregate_by_date(entries.as_array().unwrap(), true);
        assert_eq!(points.len(), 1);
        assert_eq!(points[0].value, 3.0);
    }

    #[test]
    fn entries_are_sorted_by_date_ascending() {
        let entries = serde_json::json!([
            {"date": "20260103T000000Z", "value": 1},
            {"date": "20260101T000000Z", "value": 1},
        ]);
        let points = aggregate_by_date(entries.as_array().unwrap(), false);
        assert_eq!(points[0].timestamp, "2026-01-01");
        assert_eq!(points[1].timestamp, "2026-01-03");
    }
}
