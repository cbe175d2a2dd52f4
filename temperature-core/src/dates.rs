//! Date-range and date-format helpers shared by every adapter (§4.6).
//!
//! Each provider speaks a different date dialect over the wire (Wikimedia's
//! `YYYYMMDD`, GDELT's `YYYYMMDDHHMMSS`, most REST APIs' ISO `YYYY-MM-DD`);
//! this module is the one place those dialects are produced and parsed, so
//! an adapter never formats a date by hand.

use chrono::{Duration as ChronoDuration, NaiveDate, NaiveDateTime, Utc};
use temperature_types::TemperatureError;

/// `[start, end]` inclusive window covering the trailing `window_days` days,
/// ending today (UTC).
#[must_use]
pub fn get_date_range(window_days: u32) -> (NaiveDate, NaiveDate) {
    let end = Utc::now().date_naive();
    let start = offset_date(end, -i64::from(window_days));
    (start, end)
}

/// Today (UTC) minus `n` days. `n` may be negative to move into the future.
#[must_use]
pub fn days_ago(n: i64) -> NaiveDate {
    offset_date(Utc::now().date_naive(), n)
}

/// `date` shifted by `delta_days` (negative moves earlier).
#[must_use]
pub fn offset_date(date: NaiveDate, delta_days: i64) -> NaiveDate {
    date + ChronoDuration::days(delta_days)
}

/// How recent `date` is within a `window_days`-wide lookback ending at
/// `reference`, as a `1.0` (today) to `0.0` (at or past the edge of the
/// window) linear decay. Dates in the future relative to `reference` score
/// `1.0`; the result is always clamped to `[0.0, 1.0]`.
#[must_use]
pub fn recency_score(date: NaiveDate, reference: NaiveDate, window_days: u32) -> f64 {
    let age_days = (reference - date).num_days();
    if age_days <= 0 {
        return 1.0;
    }
    let window = f64::from(window_days.max(1));
    (1.0 - (age_days as f64 / window)).clamp(0.0, 1.0)
}

/// Wikimedia REST API date format: `YYYYMMDD`.
#[must_use]
pub fn to_wikimedia_format(date: NaiveDate) -> String {
    date.format("%Y%m%d").to_string()
}

/// GDELT DOC 2.0 API timestamp format: `YYYYMMDDHHMMSS`, midnight UTC.
#[must_use]
pub fn to_gdelt_format(date: NaiveDate) -> String {
    date.format("%Y%m%d000000").to_string()
}

/// Generic ISO `YYYY-MM-DD`, the format most REST APIs in this pipeline
/// (npm, PyPI, Alpha Vantage, DataForSEO) expect.
#[must_use]
pub fn to_api_format(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Parse a date from any of the formats this pipeline emits or consumes:
/// ISO `YYYY-MM-DD`, Wikimedia `YYYYMMDD`, or GDELT `YYYYMMDDHHMMSS`.
///
/// # Errors
/// Returns [`TemperatureError::Parse`] if `s` matches none of them.
pub fn parse_date(s: &str) -> Result<NaiveDate, TemperatureError> {
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(date);
    }
    if s.len() == 14 {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y%m%d%H%M%S") {
            return Ok(dt.date());
        }
    }
    if s.len() == 8 {
        if let Ok(date) = NaiveDate::parse_from_str(s, "%Y%m%d") {
            return Ok(date);
        }
    }
    Err(TemperatureError::Parse(format!(
        "unrecognized date format: {s}"
    )))
}

/// Convert a Unix timestamp (seconds since epoch, UTC) to a calendar date.
#[must_use]
pub fn timestamp_to_date(timestamp_secs: i64) -> NaiveDate {
    chrono::DateTime::from_timestamp(timestamp_secs, 0).map_or_else(
        || Utc::now().date_naive(),
        |dt| dt.date_naive(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn date_range_spans_exactly_window_days() {
        let (start, end) = get_date_range(30);
        assert_eq!((end - start).num_days(), 30);
    }

    #[test]
    fn wikimedia_format_is_eight_digits() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(to_wikimedia_format(date), "20260105");
    }

    #[test]
    fn gdelt_format_appends_midnight() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(to_gdelt_format(date), "20260105000000");
    }

    #[test]
    fn api_format_is_iso() {
        let date = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(to_api_format(date), "2026-01-05");
    }

    #[test]
    fn parse_date_accepts_all_three_dialects() {
        let expected = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assert_eq!(parse_date("2026-01-05").unwrap(), expected);
        assert_eq!(parse_date("20260105").unwrap(), expected);
        assert_eq!(parse_date("20260105000000").unwrap(), expected);
    }

    #[test]
    fn parse_date_rejects_garbage() {
        assert!(parse_date("not-a-date").is_err());
    }

    #[test]
    fn recency_score_decays_linearly_and_clamps() {
        let reference = NaiveDate::from_ymd_opt(2026, 1, 31).unwrap();
        let today = recency_score(reference, reference, 30);
        let half_window = recency_score(offset_date(reference, -15), reference, 30);
        let past_window = recency_score(offset_date(reference, -60), reference, 30);
        assert!((today - 1.0).abs() < f64::EPSILON);
        assert!((half_window - 0.5).abs() < 1e-9);
        assert!((past_window - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn timestamp_round_trips_through_date() {
        let date = timestamp_to_date(1_767_571_200);
        assert_eq!(date, NaiveDate::from_ymd_opt(2026, 1, 5).unwrap());
    }
}
