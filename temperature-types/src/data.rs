use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The semantic axis a [`Signal`] is grouped under for dimension aggregation.
///
/// `Sentiment` is a pseudo-dimension: legal at `Signal` construction time, but
/// folded into `Media` the moment signals are grouped by dimension (§4.6.6).
/// No [`crate::DimensionScore`] named `sentiment` ever appears in a [`crate::Report`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    /// Search/encyclopedia-style interest (Wikipedia pageviews).
    SearchInterest,
    /// News volume and sentiment (GDELT).
    Media,
    /// Package registry downloads (npm, PyPI).
    DevEcosystem,
    /// Quote/price-derived signals (Alpha Vantage).
    Financial,
    /// Paper-count signals (Semantic Scholar).
    Academic,
    /// Pseudo-dimension folded into `Media` during grouping.
    Sentiment,
}

impl Dimension {
    /// The canonical iteration order used to break hottest/fastest-mover ties
    /// and to size `config_summary.dimension_weights` (§4.6.10, §9).
    pub const CANONICAL_ORDER: [Self; 5] = [
        Self::SearchInterest,
        Self::Media,
        Self::DevEcosystem,
        Self::Financial,
        Self::Academic,
    ];

    /// Fold the `sentiment` pseudo-dimension into `media`; identity otherwise.
    #[must_use]
    pub const fn grouped(self) -> Self {
        match self {
            Self::Sentiment => Self::Media,
            other => other,
        }
    }

    /// The lowercase snake_case name used in reports and config keys.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SearchInterest => "search_interest",
            Self::Media => "media",
            Self::DevEcosystem => "dev_ecosystem",
            Self::Financial => "financial",
            Self::Academic => "academic",
            Self::Sentiment => "sentiment",
        }
    }
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How much to trust a [`Signal`]'s numeric values.
///
/// Set by the adapter at construction time; yearly-granularity sources
/// (Semantic Scholar) report `Low`, the GDELT sentiment sub-signal reports
/// `Medium`, everything else defaults to `Medium`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Coarse granularity relative to the window (e.g. yearly paper counts).
    Low,
    /// The default for most adapters.
    #[default]
    Medium,
    /// Daily-granularity, directly-measured signals.
    High,
}

/// Coarse trend label derived from a velocity value (§4.6.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    /// Velocity >= 50.
    Surging,
    /// Velocity >= 15.
    Rising,
    /// Velocity >= -15 (the default; also `Signal`'s initial state).
    #[default]
    Stable,
    /// Velocity >= -50.
    Declining,
    /// Velocity < -50.
    Crashing,
    /// Only ever produced at the Report level, for breakout topics (§4.6.9).
    New,
}

impl Direction {
    /// Map a velocity (percent) to a direction label. First matching band wins.
    #[must_use]
    pub fn from_velocity(velocity: f64) -> Self {
        if velocity >= 50.0 {
            Self::Surging
        } else if velocity >= 15.0 {
            Self::Rising
        } else if velocity >= -15.0 {
            Self::Stable
        } else if velocity >= -50.0 {
            Self::Declining
        } else {
            Self::Crashing
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Surging => "surging",
            Self::Rising => "rising",
            Self::Stable => "stable",
            Self::Declining => "declining",
            Self::Crashing => "crashing",
            Self::New => "new",
        }
    }
}

impl std::fmt::Display for Direction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single observation in a [`Signal`]'s time series.
///
/// `timestamp` is `YYYY-MM-DD` for daily signals or `YYYY` for the
/// yearly-granularity academic signal. Immutable after construction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataPoint {
    /// Date identifier; `YYYY-MM-DD` (daily) or `YYYY` (yearly).
    pub timestamp: String,
    /// The metric value at this point.
    pub value: f64,
    /// Untyped provenance payload from the upstream API response, if any.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub raw: Map<String, Value>,
}

impl DataPoint {
    /// Build a datapoint with no raw provenance payload.
    #[must_use]
    pub fn new(timestamp: impl Into<String>, value: f64) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            raw: Map::new(),
        }
    }

    /// Build a datapoint carrying a raw provenance payload.
    #[must_use]
    pub fn with_raw(timestamp: impl Into<String>, value: f64, raw: Map<String, Value>) -> Self {
        Self {
            timestamp: timestamp.into(),
            value,
            raw,
        }
    }
}

/// One time series from one provider for one metric.
///
/// Adapters construct these; the only field mutation after construction is
/// the scoring engine writing back `direction` and `velocity` — documented
/// as the sole exception to "adapters create, never mutate" (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Signal {
    /// The adapter's `SOURCE_NAME` (e.g. `"wikipedia"`, `"gdelt"`).
    pub source: String,
    /// e.g. `"pageviews"`, `"news_volume"`, `"news_sentiment"`.
    pub metric_name: String,
    /// e.g. `"views/day"`, `"articles/day"`.
    pub metric_unit: String,
    /// The dimension this signal is grouped under (may be `Sentiment`).
    pub dimension: Dimension,
    /// Observations, sorted by timestamp ascending (invariant).
    pub datapoints: Vec<DataPoint>,
    /// Last observation's value. `None` iff `datapoints` is empty.
    pub current_value: Option<f64>,
    /// Mean over the series. `None` iff `datapoints` is empty.
    pub period_avg: Option<f64>,
    /// Written only by the scoring engine, after construction.
    #[serde(default)]
    pub direction: Direction,
    /// Written only by the scoring engine, after construction.
    #[serde(default)]
    pub velocity: f64,
    /// How much to trust this signal's numeric values.
    #[serde(default)]
    pub confidence: Confidence,
    /// Small adapter-specific metadata bag (e.g. the resolved article title).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl Signal {
    /// Build a `Signal` from a list of datapoints, computing `current_value`
    /// and `period_avg` from the series per the §3 invariants. The caller is
    /// responsible for having sorted `datapoints` ascending by timestamp.
    #[must_use]
    pub fn from_datapoints(
        source: impl Into<String>,
        metric_name: impl Into<String>,
        metric_unit: impl Into<String>,
        dimension: Dimension,
        datapoints: Vec<DataPoint>,
    ) -> Self {
        let current_value = datapoints.last().map(|dp| dp.value);
        let period_avg = if datapoints.is_empty() {
            None
        } else {
            Some(datapoints.iter().map(|dp| dp.value).sum::<f64>() / datapoints.len() as f64)
        };
        Self {
            source: source.into(),
            metric_name: metric_name.into(),
            metric_unit: metric_unit.into(),
            dimension,
            datapoints,
            current_value,
            period_avg,
            direction: Direction::default(),
            velocity: 0.0,
            confidence: Confidence::default(),
            metadata: HashMap::new(),
        }
    }

    /// Attach adapter-specific metadata (builder-style).
    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    /// Attach a confidence level (builder-style).
    #[must_use]
    pub const fn with_confidence(mut self, confidence: Confidence) -> Self {
        self.confidence = confidence;
        self
    }

    /// The composite weight-table key `"<source>_<metric_name>"` used by
    /// multi-metric providers (GDELT volume vs. sentiment) to get distinct
    /// configured weights. The dimension aggregator tries this key first and
    /// falls back to the plain source name, which is how single-metric
    /// adapters are configured (§4.6.6).
    #[must_use]
    pub fn composite_weight_key(&self) -> String {
        format!("{}_{}", self.source, self.metric_name)
    }
}
