//! Grouping signals by dimension and folding them into one [`DimensionScore`]
//! each (§4.6.6).

use std::collections::BTreeMap;

use temperature_types::{Dimension, DimensionScore, Signal};

use crate::config::ScoringConfig;
use crate::normalize::normalize_signal;
use crate::velocity::{compute_velocity, direction_from_velocity};

/// Group signals by dimension (folding `sentiment` into `media`), score the
/// component signals' velocity/direction in place, and aggregate each group
/// into a [`DimensionScore`]. Dimensions with no signals are absent from the
/// result — callers must not assume all five keys are present.
#[must_use]
pub fn aggregate(signals: Vec<Signal>, config: &ScoringConfig) -> BTreeMap<String, DimensionScore> {
    let mut groups: BTreeMap<Dimension, Vec<Signal>> = BTreeMap::new();
    for mut signal in signals {
        signal.velocity = compute_velocity(&signal.datapoints);
        signal.direction = direction_from_velocity(signal.velocity);
        groups.entry(signal.dimension.grouped()).or_default().push(signal);
    }

    groups
        .into_iter()
        .map(|(dimension, signals)| (dimension.as_str().to_string(), score_group(dimension, signals, config)))
        .collect()
}

fn score_group(dimension: Dimension, signals: Vec<Signal>, config: &ScoringConfig) -> DimensionScore {
    let table = config.source_weight_table(dimension);
    let max_sources = table
        .map(std::collections::HashMap::len)
        .filter(|&n| n > 0)
        .unwrap_or(signals.len());

    let raw_weights: Vec<f64> = signals
        .iter()
        .map(|signal| {
            table
                .and_then(|t| t.get(&signal.composite_weight_key()).copied())
                .or_else(|| table.and_then(|t| t.get(&signal.source).copied()))
                .unwrap_or_else(|| 1.0 / signals.len() as f64)
        })
        .collect();

    let weight_sum: f64 = raw_weights.iter().sum();
    let weights: Vec<f64> = if weight_sum > 0.0 {
        raw_weights.iter().map(|w| w / weight_sum).collect()
    } else {
        vec![1.0 / signals.len() as f64; signals.len()]
    };

    let score: f64 = weights
        .iter()
        .zip(&signals)
        .map(|(w, s)| w * normalize_signal(s))
        .sum();
    let velocity: f64 = weights.iter().zip(&signals).map(|(w, s)| w * s.velocity).sum();

    let sparkline = signals
        .iter()
        .max_by_key(|s| s.datapoints.len())
        .map(|s| s.datapoints.iter().map(|dp| dp.value).collect())
        .unwrap_or_default();

    DimensionScore {
        name: dimension.as_str().to_string(),
        score: score.clamp(0.0, 100.0) as i32,
        direction: direction_from_velocity(velocity),
        velocity,
        active_sources: signals.len(),
        max_sources,
        sparkline,
        signals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temperature_types::DataPoint;

    fn signal(source: &str, metric: &str, dimension: Dimension, current: f64, avg: f64) -> Signal {
        let mut s = Signal::from_datapoints(
            source,
            metric,
            "units",
            dimension,
            vec![DataPoint::new("2026-01-01", avg), DataPoint::new("2026-01-02", current)],
        );
        s.current_value = Some(current);
        s.period_avg = Some(avg);
        s
    }

    #[test]
    fn single_signal_dimension_inherits_its_normalized_score() {
        let config = ScoringConfig::default();
        let signals = vec![signal("wikipedia", "pageviews", Dimension::SearchInterest, 20.0, 10.0)];
        let result = aggregate(signals, &config);
        let dim = &result["search_interest"];
        assert_eq!(dim.score, 100);
        assert_eq!(dim.active_sources, 1);
    }

    #[test]
    fn sentiment_folds_into_media() {
        let config = ScoringConfig::default();
        let signals = vec![
            signal("gdelt", "news_volume", Dimension::Media, 10.0, 10.0),
            signal("gdelt", "news_sentiment", Dimension::Sentiment, 0.0, 0.0),
        ];
        let result = aggregate(signals, &config);
        assert!(!result.contains_key("sentiment"));
        assert!(result.contains_key("media"));
        assert_eq!(result["media"].active_sources, 2);
    }

    #[test]
    fn missing_weight_key_falls_back_to_uniform_split() {
        let config = ScoringConfig::default();
        let signals = vec![
            signal("alpha_vantage", "quote", Dimension::Financial, 10.0, 10.0),
            signal("some_other_provider", "quote", Dimension::Financial, 30.0, 10.0),
        ];
        let result = aggregate(signals, &config);
        let dim = &result["financial"];
        // equal weights of 0.5 each: 50 + 150 clamped -> ((50*0.5)+(100*0.5)) = 75
        assert_eq!(dim.score, 75);
    }

    #[test]
    fn empty_input_produces_no_dimensions() {
        let config = ScoringConfig::default();
        let result = aggregate(vec![], &config);
        assert!(result.is_empty());
    }
}
