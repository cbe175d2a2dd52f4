//! Report assembly: breakout detection, overall temperature, convergence,
//! overall direction, and the hottest/fastest-mover tie-break (§4.6.5,
//! §4.6.7–§4.6.10).

use std::collections::BTreeMap;

use serde_json::json;
use temperature_types::{Dimension, DimensionScore, Direction, Report, Signal, temperature_label};

use crate::config::ScoringConfig;
use crate::dimension::aggregate;

/// A topic counts as breakout/new iff it has at least one signal and every
/// signal has fewer than 7 datapoints. An empty signal set is not breakout.
#[must_use]
pub fn detect_breakout(signals: &[Signal]) -> bool {
    signals
        .iter()
        .map(|s| s.datapoints.len())
        .max()
        .is_some_and(|max| max < 7)
}

/// Cross-dimension directional-agreement classification.
///
/// Only dimensions with `score > 0` are considered. `n/a` if fewer than two
/// qualify.
#[must_use]
pub fn classify_convergence(dimensions: &BTreeMap<String, DimensionScore>) -> String {
    let active: Vec<&DimensionScore> = dimensions.values().filter(|d| d.score > 0).collect();
    let total = active.len();
    if total < 2 {
        return "n/a".to_string();
    }

    let rising = active
        .iter()
        .filter(|d| matches!(d.direction, Direction::Surging | Direction::Rising))
        .count();
    let falling = active
        .iter()
        .filter(|d| matches!(d.direction, Direction::Declining | Direction::Crashing))
        .count();
    let mean_abs_velocity = active.iter().map(|d| d.velocity.abs()).sum::<f64>() / total as f64;

    if rising == total {
        return if mean_abs_velocity > 30.0 {
            "strongly converging up".to_string()
        } else {
            "converging up".to_string()
        };
    }
    if falling == total {
        return if mean_abs_velocity > 30.0 {
            "strongly converging down".to_string()
        } else {
            "converging down".to_string()
        };
    }
    if rising > 0 && falling > 0 {
        return "diverging".to_string();
    }
    "mixed".to_string()
}

/// Mean velocity over dimensions with `score > 0`, mapped through the
/// direction table; `new` if breakout; `stable` if no dimension qualifies.
#[must_use]
pub fn overall_direction(dimensions: &BTreeMap<String, DimensionScore>, breakout: bool) -> Direction {
    if breakout {
        return Direction::New;
    }
    let active: Vec<&DimensionScore> = dimensions.values().filter(|d| d.score > 0).collect();
    if active.is_empty() {
        return Direction::Stable;
    }
    let mean = active.iter().map(|d| d.velocity).sum::<f64>() / active.len() as f64;
    Direction::from_velocity(mean)
}

/// `(hottest, fastest_mover)` dimension names. Ties break by the canonical
/// dimension order (search_interest, media, dev_ecosystem, financial,
/// academic), so the result is stable across runs regardless of map
/// iteration order.
#[must_use]
pub fn hottest_and_fastest(dimensions: &BTreeMap<String, DimensionScore>) -> (String, String) {
    let ordered: Vec<&DimensionScore> = Dimension::CANONICAL_ORDER
        .iter()
        .filter_map(|d| dimensions.get(d.as_str()))
        .collect();

    let hottest = ordered
        .iter()
        .max_by(|a, b| a.score.cmp(&b.score))
        .map(|d| d.name.clone())
        .unwrap_or_default();

    let fastest = ordered
        .iter()
        .max_by(|a, b| a.velocity.abs().total_cmp(&b.velocity.abs()))
        .map(|d| d.name.clone())
        .unwrap_or_default();

    (hottest, fastest)
}

/// Assemble the complete [`Report`] from collected signals and per-provider
/// failures. `now` and `timestamp` are supplied by the caller (the pipeline
/// facade) rather than read from the clock here, keeping this function pure.
#[must_use]
pub fn build_report(
    topic: &str,
    window_days: u32,
    timestamp: String,
    signals: Vec<Signal>,
    errors: BTreeMap<String, String>,
    config: &ScoringConfig,
) -> Report {
    let breakout = detect_breakout(&signals);
    let dimensions = aggregate(signals, config);

    let temperature: f64 = dimensions
        .values()
        .filter_map(|d| {
            let name = d.name.as_str();
            Dimension::CANONICAL_ORDER
                .iter()
                .find(|dim| dim.as_str() == name)
                .map(|&dim| config.dimension_weight(dim) * f64::from(d.score))
        })
        .sum();
    let temperature = temperature.clamp(0.0, 100.0) as i32;

    let convergence = classify_convergence(&dimensions);
    let direction = overall_direction(&dimensions, breakout);
    let (hottest_dimension, fastest_mover) = hottest_and_fastest(&dimensions);

    let config_summary = json!({
        "window_days": window_days,
        "dimension_weights": Dimension::CANONICAL_ORDER
            .iter()
            .map(|&d| (d.as_str(), config.dimension_weight(d)))
            .collect::<BTreeMap<_, _>>(),
    });

    // Dimension aggregation is the sole place velocity/direction get written;
    // its per-signal copies are already post-scoring, so reuse them here
    // rather than scoring the series twice.
    let all_signals: Vec<Signal> = dimensions.values().flat_map(|d| d.signals.iter().cloned()).collect();

    Report {
        topic: topic.to_string(),
        timestamp,
        window_days,
        temperature,
        label: temperature_label(temperature).to_string(),
        direction,
        dimensions,
        convergence,
        hottest_dimension,
        fastest_mover,
        all_signals,
        errors,
        config_summary,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use temperature_types::DataPoint;

    fn dim(name: &str, score: i32, direction: Direction, velocity: f64) -> DimensionScore {
        DimensionScore {
            name: name.to_string(),
            score,
            direction,
            velocity,
            signals: vec![],
            active_sources: 1,
            max_sources: 1,
            sparkline: vec![],
        }
    }

    #[test]
    fn breakout_requires_all_signals_under_seven_points() {
        let short = Signal::from_datapoints("a", "m", "u", Dimension::Media, vec![DataPoint::new("d", 1.0)]);
        assert!(detect_breakout(&[short]));

        let mut points = vec![];
        for i in 0..10 {
            points.push(DataPoint::new(format!("d{i}"), 1.0));
        }
        let long = Signal::from_datapoints("a", "m", "u", Dimension::Media, points);
        assert!(!detect_breakout(&[long]));

        assert!(!detect_breakout(&[]));
    }

    #[test]
    fn convergence_needs_at_least_two_active_dimensions() {
        let mut one = BTreeMap::new();
        one.insert("media".to_string(), dim("media", 80, Direction::Rising, 20.0));
        assert_eq!(classify_convergence(&one), "n/a");
    }

    #[test]
    fn unanimous_strong_rising_is_strongly_converging_up() {
        let mut dims = BTreeMap::new();
        dims.insert("media".to_string(), dim("media", 80, Direction::Surging, 60.0));
        dims.insert("search_interest".to_string(), dim("search_interest", 70, Direction::Rising, 40.0));
        assert_eq!(classify_convergence(&dims), "strongly converging up");
    }

    #[test]
    fn mixed_signs_diverge() {
        let mut dims = BTreeMap::new();
        dims.insert("media".to_string(), dim("media", 80, Direction::Rising, 20.0));
        dims.insert("financial".to_string(), dim("financial", 40, Direction::Crashing, -60.0));
        assert_eq!(classify_convergence(&dims), "diverging");
    }

    #[test]
    fn hottest_and_fastest_break_ties_by_canonical_order() {
        let mut dims = BTreeMap::new();
        dims.insert("media".to_string(), dim("media", 90, Direction::Rising, 10.0));
        dims.insert("academic".to_string(), dim("academic", 90, Direction::Rising, 10.0));
        let (hottest, fastest) = hottest_and_fastest(&dims);
        assert_eq!(hottest, "media");
        assert_eq!(fastest, "media");
    }
}
