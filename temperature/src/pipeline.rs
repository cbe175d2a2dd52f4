use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;

use temperature_core::{execute, select, Environment, ExecutorConfig, ScoringConfig, SourceRegistry};
use temperature_types::{Report, TemperatureError};

/// Per-run overrides for the caller-supplied inputs (§6): topic, window,
/// tier flags, and the two timeout budgets.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Topic string; may contain `|||`-separated variants.
    pub topic: String,
    /// Lookback window, in days.
    pub window_days: u32,
    /// Restrict to Tier 1 sources only.
    pub quick: bool,
    /// Allow Tier 3 sources whose credentials are configured.
    pub premium: bool,
    /// Override the default 12s per-source timeout.
    pub per_source_timeout: Option<Duration>,
    /// Override the default 45s global executor budget.
    pub global_budget: Option<Duration>,
}

impl RunOptions {
    /// Build the minimal required options; `quick`/`premium` default `false`
    /// and the timeout budgets default to the executor's built-ins.
    #[must_use]
    pub fn new(topic: impl Into<String>, window_days: u32) -> Self {
        Self {
            topic: topic.into(),
            window_days,
            quick: false,
            premium: false,
            per_source_timeout: None,
            global_budget: None,
        }
    }

    /// Restrict this run to Tier 1 sources.
    #[must_use]
    pub const fn quick(mut self, yes: bool) -> Self {
        self.quick = yes;
        self
    }

    /// Allow Tier 3 sources whose credentials are configured.
    #[must_use]
    pub const fn premium(mut self, yes: bool) -> Self {
        self.premium = yes;
        self
    }

    /// Override the per-source timeout budget.
    #[must_use]
    pub const fn per_source_timeout(mut self, timeout: Duration) -> Self {
        self.per_source_timeout = Some(timeout);
        self
    }

    /// Override the global executor budget.
    #[must_use]
    pub const fn global_budget(mut self, budget: Duration) -> Self {
        self.global_budget = Some(budget);
        self
    }

    fn executor_config(&self) -> ExecutorConfig {
        let defaults = ExecutorConfig::default();
        ExecutorConfig {
            per_source_timeout: self.per_source_timeout.unwrap_or(defaults.per_source_timeout),
            global_budget: self.global_budget.unwrap_or(defaults.global_budget),
        }
    }
}

/// A completed run: the [`Report`] plus the selector's skip reasons, for a
/// renderer/CLI that wants to explain why a source didn't contribute
/// (§4.4) — this is outside the core `Report` shape, which only carries
/// execution-time failures, not selection-time ones.
#[derive(Debug, Clone)]
pub struct RunOutcome {
    /// The assembled report.
    pub report: Report,
    /// Adapter name -> reason it was excluded before the fan-out even ran.
    pub skipped: BTreeMap<String, String>,
}

/// Orchestrates one end-to-end run: select -> execute -> score (§2).
///
/// Holds a read-only-after-construction registry and the scoring weight
/// tables; both are cheap to share across concurrent runs via `Arc`
/// (the registry already is one internally).
pub struct Pipeline {
    registry: Arc<SourceRegistry>,
    scoring: ScoringConfig,
}

impl Pipeline {
    /// Build a pipeline from the crate's default adapter set
    /// (`temperature_sources::default_registry`) and the built-in Tier 1
    /// scoring configuration.
    ///
    /// # Errors
    /// Returns [`TemperatureError`] iff an adapter's HTTP client fails to
    /// build (TLS backend init failure).
    pub fn with_default_sources() -> Result<Self, TemperatureError> {
        Ok(Self {
            registry: Arc::new(temperature_sources::default_registry()?),
            scoring: ScoringConfig::default(),
        })
    }

    /// Start a [`PipelineBuilder`] for a custom registry or scoring config —
    /// used by tests that substitute `temperature_mock` sources to avoid
    /// touching the network.
    #[must_use]
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::new()
    }

    /// Run the pipeline for one topic: select adapters, fan out with dual
    /// timeout budgets, then score whatever signals arrived.
    ///
    /// Never fails on partial or total source failure (§7) — a report with
    /// zero signals still computes (temperature 0, "Frozen", "stable").
    /// `Report::has_signals` tells a caller whether anything was collected.
    pub async fn run(&self, options: &RunOptions) -> RunOutcome {
        let env = Environment::load();
        self.run_with_environment(options, &env).await
    }

    /// Like [`Pipeline::run`], but with an explicit [`Environment`] instead
    /// of one loaded from the process environment/config file — used by
    /// tests that need deterministic credential presence.
    pub async fn run_with_environment(&self, options: &RunOptions, env: &Environment) -> RunOutcome {
        let selection = select(&self.registry, &options.topic, env, options.quick, options.premium);
        let skipped = selection
            .skipped
            .iter()
            .map(|(name, reason)| ((*name).to_string(), (*reason).to_string()))
            .collect();

        let outcome = execute(
            &selection,
            &options.topic,
            options.window_days,
            env,
            options.executor_config(),
        )
        .await;

        let mut errors = BTreeMap::new();
        let mut signals = Vec::new();
        for (name, result) in outcome.all_results {
            if let Some(message) = result.error {
                errors.insert(name, message);
            } else if let Some(signal) = result.signal {
                signals.push(signal);
            }
        }
        // `execute`'s `signals` map is keyed identically to `all_results`'
        // successful slots; iterating `all_results` above already yields
        // every signal, so `outcome.signals` itself is redundant here.
        let _ = outcome.signals;

        let timestamp = Utc::now().to_rfc3339();
        let report = temperature_core::build_report(
            &options.topic,
            options.window_days,
            timestamp,
            signals,
            errors,
            &self.scoring,
        );

        RunOutcome { report, skipped }
    }
}

/// Builder for a [`Pipeline`] with a custom registry and/or scoring config.
#[derive(Default)]
pub struct PipelineBuilder {
    registry: SourceRegistry,
    scoring: ScoringConfig,
}

impl PipelineBuilder {
    /// Start from an empty registry and the built-in Tier 1 scoring
    /// defaults.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: SourceRegistry::new(),
            scoring: ScoringConfig::default(),
        }
    }

    /// Register one adapter.
    ///
    /// # Errors
    /// Returns an error iff `source.name()` collides with one already
    /// registered.
    pub fn with_source(mut self, source: Arc<dyn temperature_core::Source>) -> Result<Self, temperature_core::RegistryError> {
        self.registry.register(source)?;
        Ok(self)
    }

    /// Override the scoring configuration (dimension/source weight tables).
    #[must_use]
    pub fn scoring(mut self, scoring: ScoringConfig) -> Self {
        self.scoring = scoring;
        self
    }

    /// Finish construction.
    #[must_use]
    pub fn build(self) -> Pipeline {
        Pipeline {
            registry: Arc::new(self.registry.finish()),
            scoring: self.scoring,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use temperature_mock::{fixtures, MockSource};
    use temperature_types::Dimension;

    fn env() -> Environment {
        Environment::from_credentials(HashMap::new())
    }

    #[tokio::test]
    async fn a_single_tier1_source_produces_a_scored_report() {
        let pipeline = Pipeline::builder()
            .with_source(Arc::new(MockSource::new(
                "wikipedia",
                "Wikipedia",
                Dimension::SearchInterest,
                "pageviews",
                "views/day",
                fixtures::flat(14, 100.0),
            )))
            .unwrap()
            .build();

        let options = RunOptions::new("rust", 30);
        let outcome = pipeline.run_with_environment(&options, &env()).await;

        assert!(outcome.report.has_signals());
        assert_eq!(outcome.report.dimensions["search_interest"].score, 50);
        assert!(outcome.skipped.is_empty());
    }

    #[tokio::test]
    async fn zero_signals_still_produces_a_frozen_report() {
        let pipeline = Pipeline::builder().build();
        let options = RunOptions::new("rust", 30);
        let outcome = pipeline.run_with_environment(&options, &env()).await;

        assert!(!outcome.report.has_signals());
        assert_eq!(outcome.report.temperature, 0);
        assert_eq!(outcome.report.label, "Frozen");
    }

    #[tokio::test]
    async fn failed_source_surfaces_in_errors_without_blocking_the_report() {
        let pipeline = Pipeline::builder()
            .with_source(Arc::new(MockSource::new(
                "wikipedia",
                "Wikipedia",
                Dimension::SearchInterest,
                "pageviews",
                "views/day",
                fixtures::flat(14, 100.0),
            )))
            .unwrap()
            .build();

        let options = RunOptions::new(temperature_mock::FAIL_TOPIC, 30);
        let outcome = pipeline.run_with_environment(&options, &env()).await;

        assert!(!outcome.report.has_signals());
        assert!(outcome.report.errors.contains_key("wikipedia"));
    }

    #[tokio::test]
    async fn tier2_source_without_credentials_is_skipped() {
        let pipeline = Pipeline::builder()
            .with_source(Arc::new(
                MockSource::new("alpha_vantage", "Alpha Vantage", Dimension::Financial, "close", "usd", fixtures::flat(5, 1.0))
                    .with_tier(temperature_core::Tier::Two),
            ))
            .unwrap()
            .build();

        let options = RunOptions::new("AAPL", 30);
        let outcome = pipeline.run_with_environment(&options, &env()).await;

        assert_eq!(outcome.skipped.get("alpha_vantage"), Some(&"API key not configured".to_string()));
    }
}
