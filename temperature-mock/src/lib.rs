//! temperature-mock
//!
//! Deterministic, network-free [`Source`] implementations used by
//! `temperature-core`'s and `temperature`'s own test suites to exercise the
//! selector and executor without depending on any live provider.
#![warn(missing_docs)]

use async_trait::async_trait;

use temperature_core::{Environment, SearchContext, Source, Tier};
use temperature_types::{DataPoint, Dimension, Signal, TemperatureError};

/// Topic that makes a [`MockSource`] return `Err(TemperatureError::Source)`,
/// mirroring the teacher crate's `"FAIL"` sentinel.
pub const FAIL_TOPIC: &str = "FAIL";

/// Topic that makes a [`MockSource`] sleep past its per-source timeout
/// budget, so the executor's per-source `tokio::time::timeout` fires.
pub const TIMEOUT_TOPIC: &str = "TIMEOUT";

/// Topic that makes a [`MockSource`] return `Ok(vec![])` (no data).
pub const EMPTY_TOPIC: &str = "EMPTY";

/// A handful of ready-made, monotonic and oscillating fixture series for
/// constructing [`MockSource`]s without hand-writing datapoints in every test.
pub mod fixtures {
    use temperature_types::DataPoint;

    /// `len` datapoints of `base + i` (steadily rising), dated `2026-01-01`
    /// onward.
    #[must_use]
    pub fn rising(len: usize, base: f64) -> Vec<DataPoint> {
        (0..len)
            .map(|i| DataPoint::new(format!("2026-01-{:02}", i + 1), base + i as f64))
            .collect()
    }

    /// `len` identical-value datapoints.
    #[must_use]
    pub fn flat(len: usize, value: f64) -> Vec<DataPoint> {
        (0..len)
            .map(|i| DataPoint::new(format!("2026-01-{:02}", i + 1), value))
            .collect()
    }

    /// A single datapoint, for exercising breakout-detection paths.
    #[must_use]
    pub fn single(value: f64) -> Vec<DataPoint> {
        vec![DataPoint::new("2026-01-01", value)]
    }
}

/// One fixed metric series, returned as a single-element `Vec<Signal>` on
/// every successful call. The sentinel topics [`FAIL_TOPIC`], [`TIMEOUT_TOPIC`],
/// and [`EMPTY_TOPIC`] override the fixture to exercise the executor's error,
/// timeout, and empty-result paths respectively.
pub struct MockSource {
    name: &'static str,
    display_name: &'static str,
    tier: Tier,
    dimension: Dimension,
    metric_name: &'static str,
    metric_unit: &'static str,
    fixture: Vec<DataPoint>,
    available: bool,
    relevant: bool,
}

impl MockSource {
    /// Build a Tier 1 mock, always available and always relevant, carrying
    /// `fixture` as its series.
    #[must_use]
    pub fn new(
        name: &'static str,
        display_name: &'static str,
        dimension: Dimension,
        metric_name: &'static str,
        metric_unit: &'static str,
        fixture: Vec<DataPoint>,
    ) -> Self {
        Self {
            name,
            display_name,
            tier: Tier::One,
            dimension,
            metric_name,
            metric_unit,
            fixture,
            available: true,
            relevant: true,
        }
    }

    /// Override the tier (e.g. to exercise Tier 2/3 selector gating; use a
    /// `name` from `temperature_core::environment`'s recognized Tier 2/3
    /// source list so the key gate has something to check).
    #[must_use]
    pub const fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Force `is_available` to return `false`.
    #[must_use]
    pub const fn unavailable(mut self) -> Self {
        self.available = false;
        self
    }

    /// Force `should_search` to return `false`.
    #[must_use]
    pub const fn irrelevant(mut self) -> Self {
        self.relevant = false;
        self
    }
}

#[async_trait]
impl Source for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        self.display_name
    }

    fn tier(&self) -> Tier {
        self.tier
    }

    fn dimension(&self) -> Dimension {
        self.dimension
    }

    fn is_available(&self, _env: &Environment) -> bool {
        self.available
    }

    fn should_search(&self, _topic: &str) -> bool {
        self.relevant
    }

    async fn search(
        &self,
        topic: &str,
        _window_days: u32,
        ctx: &SearchContext,
    ) -> Result<Vec<Signal>, TemperatureError> {
        match topic {
            FAIL_TOPIC => Err(TemperatureError::source(self.name, "forced failure")),
            TIMEOUT_TOPIC => {
                tokio::time::sleep(ctx.per_source_timeout + std::time::Duration::from_millis(500)).await;
                Ok(vec![])
            }
            EMPTY_TOPIC => Ok(vec![]),
            _ => Ok(vec![Signal::from_datapoints(
                self.name,
                self.metric_name,
                self.metric_unit,
                self.dimension,
                self.fixture.clone(),
            )]),
        }
    }
}

/// A GDELT-shaped mock: every successful call returns two signals (volume
/// and sentiment) under the same source name, exercising the executor's
/// multi-signal recording path and the scoring engine's
/// `"<source>_<metric_name>"` weight lookup.
pub struct MockMultiSource {
    name: &'static str,
    display_name: &'static str,
    volume: Vec<DataPoint>,
    sentiment: Vec<DataPoint>,
}

impl MockMultiSource {
    /// Build a mock that returns a `news_volume` and a `news_sentiment`
    /// signal together, both under `name`.
    #[must_use]
    pub const fn new(name: &'static str, display_name: &'static str, volume: Vec<DataPoint>, sentiment: Vec<DataPoint>) -> Self {
        Self {
            name,
            display_name,
            volume,
            sentiment,
        }
    }
}

#[async_trait]
impl Source for MockMultiSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn display_name(&self) -> &'static str {
        self.display_name
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

    async fn search(
        &self,
        topic: &str,
        _window_days: u32,
        _ctx: &SearchContext,
    ) -> Result<Vec<Signal>, TemperatureError> {
        match topic {
            FAIL_TOPIC => Err(TemperatureError::source(self.name, "forced failure")),
            EMPTY_TOPIC => Ok(vec![]),
            _ => Ok(vec![
                Signal::from_datapoints(self.name, "news_volume", "articles/day", Dimension::Media, self.volume.clone()),
                Signal::from_datapoints(self.name, "news_sentiment", "tone", Dimension::Sentiment, self.sentiment.clone()),
            ]),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temperature_core::{select, SourceRegistry};
    use std::sync::Arc;

    fn env() -> Environment {
        Environment::from_credentials(std::collections::HashMap::new())
    }

    #[test]
    fn mock_source_is_selected_when_available_and_relevant() {
        let mut registry = SourceRegistry::new();
        registry
            .register(Arc::new(MockSource::new(
                "mock",
                "Mock",
                Dimension::SearchInterest,
                "metric",
                "unit",
                fixtures::rising(5, 1.0),
            )))
            .unwrap();
        let selection = select(&registry, "rust", &env(), false, false);
        assert!(selection.selected.contains_key("mock"));
    }

    #[test]
    fn unavailable_mock_is_skipped() {
        let mut registry = SourceRegistry::new();
        registry
            .register(Arc::new(
                MockSource::new("mock", "Mock", Dimension::SearchInterest, "metric", "unit", fixtures::flat(3, 1.0))
                    .unavailable(),
            ))
            .unwrap();
        let selection = select(&registry, "rust", &env(), false, false);
        assert_eq!(selection.skipped.get("mock"), Some(&"not available"));
    }

    #[tokio::test]
    async fn fail_topic_returns_source_error() {
        let source = MockSource::new("mock", "Mock", Dimension::Media, "metric", "unit", fixtures::flat(3, 1.0));
        let ctx = SearchContext {
            per_source_timeout: std::time::Duration::from_secs(1),
            credentials: std::collections::HashMap::new(),
        };
        let err = source.search(FAIL_TOPIC, 30, &ctx).await.unwrap_err();
        assert_eq!(err.classify(), temperature_types::ErrorKind::Source);
    }

    #[tokio::test]
    async fn multi_source_returns_two_signals() {
        let source = MockMultiSource::new("gdelt", "GDELT", fixtures::rising(10, 5.0), fixtures::flat(10, 2.0));
        let ctx = SearchContext {
            per_source_timeout: std::time::Duration::from_secs(1),
            credentials: std::collections::HashMap::new(),
        };
        let signals = source.search("rust", 30, &ctx).await.unwrap();
        assert_eq!(signals.len(), 2);
    }
}
