//! Week-over-week velocity and the direction it implies (§4.6.3, §4.6.4).

use temperature_types::{DataPoint, Direction};

/// Percentage change between the recent and previous window of a series.
///
/// - Fewer than 2 points → `0.0`.
/// - 14 or more points: mean of the last 7 vs. the preceding 7.
/// - Otherwise: split at the midpoint (`len / 2`), second half vs. first.
/// - Previous-window mean of `0.0`: `+100.0` if the recent mean is positive,
///   else `0.0`.
#[must_use]
pub fn compute_velocity(datapoints: &[DataPoint]) -> f64 {
    if datapoints.len() < 2 {
        return 0.0;
    }

    let values: Vec<f64> = datapoints.iter().map(|dp| dp.value).collect();

    let (previous, recent) = if values.len() >= 14 {
        let split = values.len() - 7;
        (&values[split - 7..split], &values[split..])
    } else {
        let midpoint = values.len() / 2;
        (&values[..midpoint], &values[midpoint..])
    };

    let avg = |xs: &[f64]| xs.iter().sum::<f64>() / xs.len() as f64;
    let avg_recent = avg(recent);
    let avg_previous = avg(previous);

    if avg_previous == 0.0 {
        return if avg_recent > 0.0 { 100.0 } else { 0.0 };
    }

    (avg_recent - avg_previous) / avg_previous * 100.0
}

/// Map a velocity (percent) to a direction label. First matching band wins:
/// `>= 50` surging, `>= 15` rising, `>= -15` stable, `>= -50` declining,
/// otherwise crashing.
#[must_use]
pub fn direction_from_velocity(velocity: f64) -> Direction {
    Direction::from_velocity(velocity)
}
