//! Scoring configuration: dimension weights and within-dimension source
//! weights, with the built-in Tier 1 defaults (§4.6.6, §4.6.7).

use std::collections::HashMap;

use temperature_types::Dimension;

/// Per-dimension weight in the overall temperature calculation, and the
/// nested per-source weight tables used by dimension aggregation.
///
/// Both tables default to the Tier 1 configuration; callers override either
/// with [`ScoringConfig::with_dimension_weight`] /
/// [`ScoringConfig::with_source_weight`] to fold in Tier 2/3 adapters.
#[derive(Debug, Clone)]
pub struct ScoringConfig {
    dimension_weights: HashMap<Dimension, f64>,
    source_weights: HashMap<Dimension, HashMap<String, f64>>,
}

impl Default for ScoringConfig {
    /// Equal 0.20 weight per canonical dimension; Tier 1 source weights
    /// (GDELT volume/sentiment split 60/40, npm/pypi split 50/50, everything
    /// else at 1.0). Financial and any Tier 2/3 dimension starts with an
    /// empty source table — §4.6.6's "missing key" rule then falls back to
    /// `1/|signals|` for whatever adapters actually report into it.
    fn default() -> Self {
        let mut dimension_weights = HashMap::new();
        for dim in Dimension::CANONICAL_ORDER {
            dimension_weights.insert(dim, 0.20);
        }

        let mut source_weights = HashMap::new();
        source_weights.insert(
            Dimension::SearchInterest,
            HashMap::from([("wikipedia".to_string(), 1.0)]),
        );
        source_weights.insert(
            Dimension::Media,
            HashMap::from([
                ("gdelt_news_volume".to_string(), 0.60),
                ("gdelt_news_sentiment".to_string(), 0.40),
            ]),
        );
        source_weights.insert(
            Dimension::DevEcosystem,
            HashMap::from([("npm".to_string(), 0.50), ("pypi".to_string(), 0.50)]),
        );
        source_weights.insert(Dimension::Financial, HashMap::new());
        source_weights.insert(
            Dimension::Academic,
            HashMap::from([("semantic_scholar".to_string(), 1.0)]),
        );

        Self {
            dimension_weights,
            source_weights,
        }
    }
}

impl ScoringConfig {
    /// Start from the built-in defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Override one dimension's weight in the overall-temperature blend.
    #[must_use]
    pub fn with_dimension_weight(mut self, dimension: Dimension, weight: f64) -> Self {
        self.dimension_weights.insert(dimension.grouped(), weight);
        self
    }

    /// Override (or add) one source's weight within a dimension's table.
    #[must_use]
    pub fn with_source_weight(mut self, dimension: Dimension, key: impl Into<String>, weight: f64) -> Self {
        self.source_weights
            .entry(dimension.grouped())
            .or_default()
            .insert(key.into(), weight);
        self
    }

    /// This dimension's weight in the overall blend, or `0.0` if unconfigured.
    #[must_use]
    pub fn dimension_weight(&self, dimension: Dimension) -> f64 {
        self.dimension_weights.get(&dimension.grouped()).copied().unwrap_or(0.0)
    }

    /// The configured source-weight table for a dimension, if any.
    #[must_use]
    pub fn source_weight_table(&self, dimension: Dimension) -> Option<&HashMap<String, f64>> {
        self.source_weights.get(&dimension.grouped())
    }

    /// All dimension weights, canonical-order keys, for `Report::config_summary`.
    #[must_use]
    pub fn dimension_weights(&self) -> &HashMap<Dimension, f64> {
        &self.dimension_weights
    }

    /// All source-weight tables, for `Report::config_summary`.
    #[must_use]
    pub fn source_weights(&self) -> &HashMap<Dimension, HashMap<String, f64>> {
        &self.source_weights
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_dimension_weights_sum_to_one() {
        let config = ScoringConfig::default();
        let sum: f64 = Dimension::CANONICAL_ORDER
            .iter()
            .map(|&d| config.dimension_weight(d))
            .sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn media_source_weights_sum_to_one() {
        let config = ScoringConfig::default();
        let table = config.source_weight_table(Dimension::Media).unwrap();
        let sum: f64 = table.values().sum();
        assert!((sum - 1.0).abs() < 1e-9);
    }

    #[test]
    fn override_replaces_a_single_dimension_weight() {
        let config = ScoringConfig::default().with_dimension_weight(Dimension::Financial, 0.5);
        assert!((config.dimension_weight(Dimension::Financial) - 0.5).abs() < 1e-9);
        assert!((config.dimension_weight(Dimension::Media) - 0.20).abs() < 1e-9);
    }
}
