//! Semantic Scholar — paper counts grouped by year (academic).
//!
//! Year-granularity results only, so every signal carries `confidence =
//! low`. A 429 is wrapped as `TemperatureError::Source` ("rate limited:
//! shared pool contention") rather than surfaced as a retryable HTTP error —
//! the executor's classification table routes that straight to `source` and
//! the transport's retry-once policy never sees it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{Datelike, Utc};
use serde_json::Value;

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{http, Tier};
use temperature_types::{Confidence, DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "semantic_scholar";
const DISPLAY_NAME: &str = "Semantic Scholar";

/// Results beyond a year are returned per page; one page is enough for the
/// year-bucketing this adapter does.
const RESULT_LIMIT: u32 = 100;

/// Academic adapter backed by the Semantic Scholar Graph API.
pub struct SemanticScholar {
    client: reqwest::Client,
}

impl SemanticScholar {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    async fn search_papers(&self, query: &str, year_range: &str, ctx: &SearchContext) -> Result<Value, TemperatureError> {
        let mut url = url::Url::parse("https://api.semanticscholar.org/graph/v1/paper/search")
            .expect("static base url");
        url.query_pairs_mut()
            .append_pair("query", query)
            .append_pair("year", year_range)
            .append_pair("fields", "year,citationCount")
            .append_pair("limit", &RESULT_LIMIT.to_string());

        let headers: Vec<(&str, &str)> = ctx
            .credential("SEMANTIC_SCHOLAR_KEY")
            .map(|key| vec![("x-api-key", key)])
            .unwrap_or_default();

        match http::get(&self.client, url.as_str(), &headers).await {
            Ok(data) => Ok(data),
            Err(TemperatureError::Http { status: 429, .. }) => Err(TemperatureError::source(
                SOURCE_NAME,
                "rate limited: shared pool contention",
            )),
            Err(e) => Err(e),
        }
    }
}

/// `"{year}-{year}"` for `window_days <= 365`, else `"{start_year}-{year}"`
/// spanning back `ceil(window_days / 365)` years.
#[must_use]
fn year_range(window_days: u32, current_year: i32) -> String {
    if window_days <= 365 {
        return format!("{current_year}-{current_year}");
    }
    let years_back = window_days.div_ceil(365);
    let start_year = current_year - i32::try_from(years_back).unwrap_or(i32::MAX);
    format!("{start_year}-{current_year}")
}

fn group_by_year(papers: &[Value]) -> BTreeMap<i64, i64> {
    let mut counts: BTreeMap<i64, i64> = BTreeMap::new();
    for paper in papers {
        if let Some(year) = paper.get("year").and_then(Value::as_i64) {
            *counts.entry(year).or_default() += 1;
        }
    }
    counts
}

#[async_trait]
impl Source for SemanticScholar {
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
        Dimension::Academic
    }

    fn is_available(&self, _env: &Environment) -> bool {
        true
    }

    fn should_search(&self, _topic: &str) -> bool {
        true
    }

    async fn search(&self, topic: &str, window_days: u32, ctx: &SearchContext) -> Result<Vec<Signal>, TemperatureError> {
        let Some(query) = topic_variants(topic).into_iter().next() else {
            return Ok(vec![]);
        };

        let range = year_range(window_days, Utc::now().year());
        let data = self.search_papers(&query, &range, ctx).await?;

        let total = data.get("total").and_then(Value::as_i64).unwrap_or(0);
        let papers = data.get("data").and_then(Value::as_array).cloned().unwrap_or_default();
        if total == 0 || papers.is_empty() {
            return Ok(vec![]);
        }

        let year_counts = group_by_year(&papers);
        if year_counts.is_empty() {
            return Ok(vec![]);
        }

        let datapoints: Vec<DataPoint> = year_counts
            .iter()
            .map(|(year, count)| {
                let mut raw = serde_json::Map::new();
                raw.insert("year".to_string(), Value::from(*year));
                raw.insert("count".to_string(), Value::from(*count));
                DataPoint::with_raw(year.to_string(), *count as f64, raw)
            })
            .collect();

        let signal = Signal::from_datapoints(SOURCE_NAME, "paper_count", "papers", Dimension::Academic, datapoints)
            .with_confidence(Confidence::Low)
            .with_metadata("total", total.to_string())
            .with_metadata("year_range", range)
            .with_metadata("query", query);

        Ok(vec![signal])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_window_uses_current_year_only() {
        assert_eq!(year_range(30, 2026), "2026-2026");
        assert_eq!(year_range(365, 2026), "2026-2026");
    }

    #[test]
    fn long_window_spans_back_by_ceiling_years() {
        assert_eq!(year_range(366, 2026), "2025-2026");
        assert_eq!(year_range(730, 2026), "2024-2026");
    }

    #[test]
    fn papers_are_grouped_and_counted_by_year() {
        let papers = serde_json::json!([
            {"year": 2025}, {"year": 2025}, {"year": 2026},
        ]);
        let counts = group_by_year(papers.as_array().unwrap());
        assert_eq!(counts.get(&2025), Some(&2));
        assert_eq!(counts.get(&2026), Some(&1));
    }
}
