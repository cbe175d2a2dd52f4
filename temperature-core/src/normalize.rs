//! Per-signal normalization: mapping one [`Signal`]'s level to a `[0, 100]`
//! score (§4.6.1, §4.6.2).

use temperature_types::Signal;

fn clamp(value: f64, lo: f64, hi: f64) -> f64 {
    value.max(lo).min(hi)
}

/// Score a single signal, `[0, 100]`. A score of 50 means "at its own
/// period average"; this is purely level-based — velocity never adjusts it.
///
/// `news_sentiment` signals are routed to [`normalize_sentiment`] instead,
/// using `current_value` as the tone (0.0 if absent).
#[must_use]
pub fn normalize_signal(signal: &Signal) -> f64 {
    if signal.metric_name == "news_sentiment" {
        return normalize_sentiment(signal.current_value.unwrap_or(0.0));
    }

    let Some(current) = signal.current_value else {
        return 0.0;
    };

    match signal.period_avg {
        None => below_or_above_baseline(current),
        Some(avg) if avg == 0.0 => below_or_above_baseline(current),
        Some(avg) => clamp(50.0 * current / avg, 0.0, 100.0),
    }
}

fn below_or_above_baseline(current: f64) -> f64 {
    if current > 0.0 {
        75.0
    } else {
        0.0
    }
}

/// Map a GDELT-style tone (practical range `[-10, +10]`, clamped outside) to
/// `[0, 100]`: `-10 -> 0`, `0 -> 50`, `+10 -> 100`. Positive sentiment reads
/// hotter; negative sentiment cools the topic down.
#[must_use]
pub fn normalize_sentiment(tone: f64) -> f64 {
    let clamped = clamp(tone, -10.0, 10.0);
    clamp((clamped + 10.0) * 5.0, 0.0, 100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use temperature_types::{DataPoint, Dimension};

    fn signal_with(current: Option<f64>, avg: Option<f64>) -> Signal {
        let mut s = Signal::from_datapoints("test", "metric", "unit", Dimension::Media, vec![
            DataPoint::new("2026-01-01", 0.0),
        ]);
        s.current_value = current;
        s.period_avg = avg;
        s
    }

    #[test]
    fn missing_current_value_scores_zero() {
        assert_eq!(normalize_signal(&signal_with(None, Some(10.0))), 0.0);
    }

    #[test]
    fn zero_baseline_with_positive_current_scores_seventy_five() {
        assert_eq!(normalize_signal(&signal_with(Some(5.0), Some(0.0))), 75.0);
    }

    #[test]
    fn zero_baseline_with_zero_current_scores_zero() {
        assert_eq!(normalize_signal(&signal_with(Some(0.0), Some(0.0))), 0.0);
    }

    #[test]
    fn double_the_average_scores_one_hundred() {
        assert_eq!(normalize_signal(&signal_with(Some(20.0), Some(10.0))), 100.0);
    }

    #[test]
    fn at_average_scores_fifty() {
        assert_eq!(normalize_signal(&signal_with(Some(10.0), Some(10.0))), 50.0);
    }

    #[test]
    fn sentiment_extremes_map_to_range_ends() {
        assert_eq!(normalize_sentiment(-10.0), 0.0);
        assert_eq!(normalize_sentiment(0.0), 50.0);
        assert_eq!(normalize_sentiment(10.0), 100.0);
        assert_eq!(normalize_sentiment(99.0), 100.0);
    }
}
