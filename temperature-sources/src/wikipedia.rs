//! Wikipedia Pageviews — daily pageview counts via the Wikimedia REST API.
//!
//! Resolves a topic to an article title through MediaWiki search, scoring
//! candidates by technology-disambiguation hint words, then fetches daily
//! pageviews for the winner.

use async_trait::async_trait;
use serde_json::Value;

use temperature_core::environment::Environment;
use temperature_core::source::{topic_variants, SearchContext, Source};
use temperature_core::{dates, http, Tier};
use temperature_types::{DataPoint, Dimension, Signal, TemperatureError};

const SOURCE_NAME: &str = "wikipedia";
const DISPLAY_NAME: &str = "Wikipedia Pageviews";

/// Words that tip disambiguation toward the technology-flavored sense of a
/// topic when Wikipedia search returns several candidate articles.
const TECH_HINTS: [&str; 13] = [
    "programming",
    "software",
    "library",
    "framework",
    "language",
    "computing",
    "technology",
    "web",
    "tool",
    "protocol",
    "algorithm",
    "database",
    "api",
];

/// Search-interest adapter backed by Wikipedia pageview counts.
pub struct Wikipedia {
    client: reqwest::Client,
}

impl Wikipedia {
    /// Build the adapter's HTTP client.
    ///
    /// # Errors
    /// Returns an error iff the TLS backend fails to initialize.
    pub fn new() -> Result<Self, TemperatureError> {
        Ok(Self {
            client: http::build_client(http::DEFAULT_TIMEOUT)?,
        })
    }

    async fn resolve_article(&self, query: &str) -> Option<String> {
        let mut url = url::Url::parse("https://en.wikipedia.org/w/api.php").ok()?;
        url.query_pairs_mut()
            .append_pair("action", "query")
            .append_pair("list", "search")
            .append_pair("srsearch", query)
            .append_pair("srlimit", "5")
            .append_pair("format", "json");

        let data = http::get(&self.client, url.as_str(), &[]).await.ok()?;
        let results = data.pointer("/query/search")?.as_array()?;
        if results.is_empty() {
            return None;
        }

        let mut best_title = results[0].get("title")?.as_str()?.to_string();
        let mut best_score = 0usize;
        for result in results {
            let Some(title) = result.get("title").and_then(Value::as_str) else {
                continue;
            };
            let snippet = result
                .get("snippet")
                .and_then(Value::as_str)
                .unwrap_or("")
                .to_lowercase();
            let title_lower = title.to_lowercase();
            let score = TECH_HINTS
                .iter()
                .filter(|hint| title_lower.contains(*hint) || snippet.contains(*hint))
                .count();
            if score > best_score {
                best_score = score;
                best_title = title.to_string();
            }
        }

        Some(best_title.replace(' ', "_"))
    }

    async fn fetch_pageviews(&self, article: &str, start: &str, end: &str) -> Result<Vec<DataPoint>, TemperatureError> {
        let mut url = url::Url::parse(
            "https://wikimedia.org/api/rest_v1/metrics/pageviews/per-article/en.wikipedia.org/all-access/user/",
        )
        .expect("static base url");
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|()| TemperatureError::Parse("invalid wikimedia base url".to_string()))?;
            segments.pop_if_empty();
            segments.push(article).push("daily").push(start).push(end);
        }

        let data = http::get(&self.client, url.as_str(), &[]).await?;
        let items = data
            .get("items")
            .and_then(Value::as_array)
            .ok_or_else(|| TemperatureError::source(SOURCE_NAME, "response missing 'items' field"))?;

        let mut datapoints = Vec::with_capacity(items.len());
        for item in items {
            let Some(timestamp) = item.get("timestamp").and_then(Value::as_str) else {
                continue;
            };
            if timestamp.len() < 8 {
                continue;
            }
            let views = item.get("views").and_then(Value::as_f64).unwrap_or(0.0);
            let date = format!("{}-{}-{}", &timestamp[0..4], &timestamp[4..6], &timestamp[6..8]);
            datapoints.push(DataPoint::new(date, views));
        }
        Ok(datapoints)
    }
}

#[async_trait]
impl Source for Wikipedia {
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
        Dimension::SearchInterest
    }

    fn is_available(&self, _env: &Environment) -> bool {
        true
    }

    fn should_search(&self, _topic: &str) -> bool {
        true
    }

    async fn search(&self, topic: &str, window_days: u32, _ctx: &SearchContext) -> Result<Vec<Signal>, TemperatureError> {
        let variants = topic_variants(topic);

        let mut article = None;
        for variant in &variants {
            if let Some(found) = self.resolve_article(variant).await {
                article = Some(found);
                break;
            }
        }
        let Some(article) = article else {
            return Ok(vec![]);
        };

        let (from_date, to_date) = dates::get_date_range(window_days);
        let start = dates::to_wikimedia_format(from_date);
        let end = dates::to_wikimedia_format(to_date);

        let datapoints = self.fetch_pageviews(&article, &start, &end).await?;
        if datapoints.is_empty() {
            return Ok(vec![]);
        }

        let signal = Signal::from_datapoints(SOURCE_NAME, "pageviews", "views/day", Dimension::SearchInterest, datapoints)
            .with_metadata("article", article);
        Ok(vec![signal])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tech_hint_scoring_prefers_more_matches() {
        let title_lower = "rust (programming language)".to_string();
        let score = TECH_HINTS.iter().filter(|h| title_lower.contains(*h)).count();
        assert!(score >= 2);
    }
}
