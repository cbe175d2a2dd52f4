use std::collections::HashMap;
use std::sync::Arc;

use temperature::{Pipeline, RunOptions};
use temperature_core::{Environment, ScoringConfig, Tier};
use temperature_mock::{fixtures, MockMultiSource, MockSource, EMPTY_TOPIC, TIMEOUT_TOPIC};
use temperature_types::{DataPoint, Dimension, Direction};

fn env() -> Environment {
    Environment::from_credentials(HashMap::new())
}

fn env_with(keys: &[(&str, &str)]) -> Environment {
    let mut credentials = HashMap::new();
    for (k, v) in keys {
        credentials.insert((*k).to_string(), (*v).to_string());
    }
    Environment::from_credentials(credentials)
}

/// A week at a low baseline followed by a week roughly ten times higher, for
/// exercising the 14-point last-seven-vs-preceding-seven velocity branch with
/// an unambiguous jump.
fn step(low: f64, high: f64) -> Vec<DataPoint> {
    (0..14)
        .map(|i| {
            let value = if i < 7 { low } else { high };
            DataPoint::new(format!("2026-01-{:02}", i + 1), value)
        })
        .collect()
}

/// §8(a): a handful of balanced Tier 1 dimensions, all jumping upward in
/// lockstep, should converge strongly upward. With only 3 of the 5
/// configured dimensions reporting (financial and academic are silent), the
/// overall temperature is diluted below what a full five-dimension topic
/// would reach, matching `config_summary.dimension_weights`' flat 0.20 split.
#[tokio::test]
async fn balanced_popular_topic_converges_strongly_upward() {
    let pipeline = Pipeline::builder()
        .with_source(Arc::new(MockSource::new(
            "wikipedia",
            "Wikipedia",
            Dimension::SearchInterest,
            "pageviews",
            "views/day",
            step(10.0, 100.0),
        )))
        .unwrap()
        .with_source(Arc::new(MockMultiSource::new(
            "gdelt",
            "GDELT",
            step(10.0, 100.0),
            step(0.0, 10.0),
        )))
        .unwrap()
        .with_source(Arc::new(MockSource::new(
            "npm",
            "npm",
            Dimension::DevEcosystem,
            "downloads",
            "downloads/day",
            step(10.0, 100.0),
        )))
        .unwrap()
        .build();

    let outcome = pipeline.run_with_environment(&RunOptions::new("rust", 30), &env()).await;
    let report = outcome.report;

    assert!(report.has_signals());
    assert!(report.temperature >= 46, "expected at least a Warm report, got {}", report.temperature);
    assert_eq!(report.dimensions.len(), 3);
    assert_eq!(report.convergence, "strongly converging up");
    assert!(matches!(report.direction, Direction::Surging | Direction::Rising));
}

/// §8(b): only one dimension reports. The overall temperature is diluted by
/// the other four configured-but-absent dimensions, and convergence is n/a
/// since fewer than two dimensions have `score > 0`.
#[tokio::test]
async fn single_dimension_topic_is_diluted_and_has_no_convergence() {
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

    let outcome = pipeline.run_with_environment(&RunOptions::new("niche topic", 30), &env()).await;
    let report = outcome.report;

    assert_eq!(report.dimensions.len(), 1);
    // one dimension at score 50, weighted 0.20 of the overall blend -> 10
    assert_eq!(report.temperature, 10);
    assert_eq!(report.convergence, "n/a");
}

/// §8(c): a current value of zero against a positive baseline scores zero,
/// not the zero-baseline escape hatch (that only applies when the baseline
/// itself is zero).
#[tokio::test]
async fn current_value_dropping_to_zero_scores_zero() {
    let datapoints = vec![
        DataPoint::new("2026-01-01", 100.0),
        DataPoint::new("2026-01-02", 100.0),
        DataPoint::new("2026-01-03", 0.0),
    ];
    let pipeline = Pipeline::builder()
        .with_source(Arc::new(MockSource::new(
            "wikipedia",
            "Wikipedia",
            Dimension::SearchInterest,
            "pageviews",
            "views/day",
            datapoints,
        )))
        .unwrap()
        .build();

    let outcome = pipeline.run_with_environment(&RunOptions::new("fading topic", 30), &env()).await;
    let dim = &outcome.report.dimensions["search_interest"];
    assert_eq!(dim.score, 0);
}

/// §8(d): GDELT's two signals (volume, sentiment) both land under `media`
/// once sentiment folds in, combined per the configured 60/40 split.
#[tokio::test]
async fn multi_signal_provider_folds_into_one_dimension() {
    let pipeline = Pipeline::builder()
        .with_source(Arc::new(MockMultiSource::new(
            "gdelt",
            "GDELT",
            fixtures::flat(14, 50.0),
            fixtures::flat(14, 0.0),
        )))
        .unwrap()
        .build();

    let outcome = pipeline.run_with_environment(&RunOptions::new("rust", 30), &env()).await;
    let report = outcome.report;

    assert_eq!(report.dimensions.len(), 1);
    let media = &report.dimensions["media"];
    assert_eq!(media.active_sources, 2);
    // volume at 50 (flat -> score 50) weight 0.60, sentiment tone 0.0 -> score 50, weight 0.40
    assert_eq!(media.score, 50);
}

/// §8(e): a brand-new topic with short series on every dimension is a
/// breakout; the report's overall direction is "new" regardless of velocity.
#[tokio::test]
async fn breakout_topic_reports_new_direction() {
    let pipeline = Pipeline::builder()
        .with_source(Arc::new(MockSource::new(
            "wikipedia",
            "Wikipedia",
            Dimension::SearchInterest,
            "pageviews",
            "views/day",
            fixtures::single(10.0),
        )))
        .unwrap()
        .build();

    let outcome = pipeline.run_with_environment(&RunOptions::new("brand new thing", 30), &env()).await;
    assert_eq!(outcome.report.direction, Direction::New);
}

/// §8(f): one source times out past its per-source budget; the executor
/// still returns a report built from whichever other sources completed, and
/// records the timeout in `errors`.
#[tokio::test]
async fn slow_source_times_out_without_blocking_the_others() {
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

    let options = RunOptions::new(TIMEOUT_TOPIC, 30).per_source_timeout(std::time::Duration::from_millis(50));
    let outcome = pipeline.run_with_environment(&options, &env()).await;

    assert!(!outcome.report.has_signals());
    let message = outcome.report.errors.get("wikipedia").expect("timeout recorded");
    assert!(message.contains("timeout"), "unexpected message: {message}");
}

/// An empty-but-successful response (`EMPTY_TOPIC`) produces neither a
/// signal nor an error — it is simply absent from the report.
#[tokio::test]
async fn empty_response_is_neither_signal_nor_error() {
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

    let outcome = pipeline.run_with_environment(&RunOptions::new(EMPTY_TOPIC, 30), &env()).await;
    assert!(!outcome.report.has_signals());
    assert!(outcome.report.errors.is_empty());
}

/// `quick` restricts the run to Tier 1, skipping a configured Tier 2 source
/// even when its credential is present.
#[tokio::test]
async fn quick_mode_skips_tier_two_even_with_credentials() {
    let pipeline = Pipeline::builder()
        .with_source(Arc::new(
            MockSource::new("alpha_vantage", "Alpha Vantage", Dimension::Financial, "close", "usd", fixtures::flat(5, 1.0))
                .with_tier(Tier::Two),
        ))
        .unwrap()
        .build();

    let options = RunOptions::new("AAPL", 30).quick(true);
    let outcome = pipeline.run_with_environment(&options, &env_with(&[("ALPHA_VANTAGE_KEY", "k")])).await;

    assert_eq!(outcome.skipped.get("alpha_vantage"), Some(&"tier 2 not enabled".to_string()));
    assert!(!outcome.report.has_signals());
}

/// `premium` additionally allows a Tier 3 source once its credential is
/// configured.
#[tokio::test]
async fn premium_mode_allows_a_configured_tier_three_source() {
    let pipeline = Pipeline::builder()
        .with_source(Arc::new(
            MockSource::new("glimpse", "Glimpse", Dimension::SearchInterest, "interest", "index", fixtures::flat(14, 40.0))
                .with_tier(Tier::Three),
        ))
        .unwrap()
        .build();

    let options = RunOptions::new("rust", 30).premium(true);
    let outcome = pipeline.run_with_environment(&options, &env_with(&[("GLIMPSE_API_KEY", "k")])).await;

    assert!(outcome.skipped.is_empty());
    assert!(outcome.report.has_signals());
}

/// A custom `ScoringConfig` is honored end to end: doubling a dimension's
/// weight (and zeroing the rest) makes that dimension the entire temperature.
#[tokio::test]
async fn custom_scoring_config_changes_the_overall_temperature() {
    let scoring = ScoringConfig::default()
        .with_dimension_weight(Dimension::SearchInterest, 1.0)
        .with_dimension_weight(Dimension::Media, 0.0)
        .with_dimension_weight(Dimension::DevEcosystem, 0.0)
        .with_dimension_weight(Dimension::Financial, 0.0)
        .with_dimension_weight(Dimension::Academic, 0.0);

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
        .scoring(scoring)
        .build();

    let outcome = pipeline.run_with_environment(&RunOptions::new("rust", 30), &env()).await;
    assert_eq!(outcome.report.temperature, 50);
}
