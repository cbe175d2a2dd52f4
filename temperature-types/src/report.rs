use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::data::{Direction, Signal};

/// Aggregate score over all [`Signal`]s mapped to one dimension (§4.6.6).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DimensionScore {
    /// The dimension name, e.g. `"media"`.
    pub name: String,
    /// Integer score in `[0, 100]`.
    pub score: i32,
    /// Direction derived from `velocity`.
    pub direction: Direction,
    /// Weighted mean of the component signals' velocities.
    pub velocity: f64,
    /// The signals that composed this dimension.
    pub signals: Vec<Signal>,
    /// Number of signals that actually arrived for this dimension.
    pub active_sources: usize,
    /// Size of the configured weight table for this dimension (or
    /// `active_sources` if the table is empty/unconfigured).
    pub max_sources: usize,
    /// Value sequence of the signal with the most datapoints in this dimension.
    pub sparkline: Vec<f64>,
}

/// Complete temperature report for a topic (§3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// The topic string as given by the caller (may contain `|||` variants).
    pub topic: String,
    /// ISO-8601 timestamp of report generation.
    pub timestamp: String,
    /// Lookback window, in days, used to fetch signals.
    pub window_days: u32,
    /// Integer overall score in `[0, 100]`.
    pub temperature: i32,
    /// One of the seven tiered labels (`"Frozen"` .. `"Supernova"`).
    pub label: String,
    /// Overall direction, or `"new"` for breakout topics.
    pub direction: Direction,
    /// Dimension name -> aggregate score, only for dimensions with signals.
    pub dimensions: BTreeMap<String, DimensionScore>,
    /// Cross-dimension directional-agreement classification (§4.6.8).
    pub convergence: String,
    /// Name of the dimension with the highest score.
    pub hottest_dimension: String,
    /// Name of the dimension with the highest `|velocity|`.
    pub fastest_mover: String,
    /// Flat list of every signal collected this run, post-scoring.
    pub all_signals: Vec<Signal>,
    /// Provider name -> human-readable failure message.
    pub errors: BTreeMap<String, String>,
    /// Echo of the configuration this report was computed under (dimension
    /// weights, source weights, timeouts) so the configured ceiling (§9's Open
    /// Question) is visible to anyone reading the report alone.
    pub config_summary: Value,
}

impl Report {
    /// `true` iff at least one signal was collected. Renderers/CLIs use this
    /// to decide their process exit code (§6).
    #[must_use]
    pub fn has_signals(&self) -> bool {
        !self.all_signals.is_empty()
    }
}

/// Seven-band temperature label table (§4.6.7).
#[must_use]
pub fn temperature_label(score: i32) -> &'static str {
    match score {
        0..=15 => "Frozen",
        16..=30 => "Cold",
        31..=45 => "Cool",
        46..=60 => "Warm",
        61..=75 => "Hot",
        76..=90 => "On Fire",
        _ => "Supernova",
    }
}
