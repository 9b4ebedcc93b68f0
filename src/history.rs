//! Synthetic hourly history for the dashboard charts.
//!
//! Pure function of `(hours, now, rng)`; never touches the live sensor state.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use crate::models::HistoryPoint;

// ---

pub const DEFAULT_HOURS: i64 = 24;

/// Largest window served in one response (one year).
pub const MAX_HOURS: i64 = 24 * 365;

/// Interpret the raw `hours` query parameter.
///
/// Only an optional sign and the leading run of digits count, so `"3.5"` and
/// `"3h"` both mean 3. Missing, digit-less and zero values fall back to
/// [`DEFAULT_HOURS`]. Negative values are kept and yield an empty series.
pub fn parse_hours(raw: Option<&str>) -> i64 {
    match raw.and_then(leading_integer) {
        Some(0) | None => DEFAULT_HOURS,
        Some(h) => h.min(MAX_HOURS),
    }
}

fn leading_integer(raw: &str) -> Option<i64> {
    // ---
    let s = raw.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let end = rest
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(rest.len());
    let digits = &rest[..end];
    if digits.is_empty() {
        return None;
    }

    // Too many digits for i64 still means "a lot" in that direction.
    let magnitude = digits.parse::<i64>().unwrap_or(i64::MAX);
    Some(if negative { -magnitude } else { magnitude })
}

/// Build `hours + 1` points, oldest first, one hour apart, ending at `now`.
pub fn synthesize<R: Rng + ?Sized>(hours: i64, now: DateTime<Utc>, rng: &mut R) -> Vec<HistoryPoint> {
    // ---
    if hours < 0 {
        return Vec::new();
    }

    (0..=hours)
        .rev()
        .map(|i| {
            let t = i as f64;
            HistoryPoint {
                timestamp: now - Duration::hours(i),
                temperature: 25.0 + (t / 4.0).sin() * 5.0 + rng.random_range(-1.0..1.0),
                humidity: 65.0 + (t / 3.0).cos() * 15.0 + rng.random_range(-2.5..2.5),
                pressure: 1013.0 + (t / 6.0).sin() * 10.0 + rng.random_range(-1.0..1.0),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use chrono::TimeZone;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_parse_hours() {
        // ---
        assert_eq!(parse_hours(None), 24);
        assert_eq!(parse_hours(Some("3")), 3);
        assert_eq!(parse_hours(Some("0")), 24);
        assert_eq!(parse_hours(Some("abc")), 24);
        assert_eq!(parse_hours(Some("-2")), -2);
        assert_eq!(parse_hours(Some("1000000")), MAX_HOURS);
        assert_eq!(parse_hours(Some("3.5")), 3);
        assert_eq!(parse_hours(Some("3abc")), 3);
        assert_eq!(parse_hours(Some(" +5")), 5);
        assert_eq!(parse_hours(Some("-0")), 24);
        assert_eq!(parse_hours(Some("-")), 24);
        assert_eq!(parse_hours(Some(".5")), 24);
        assert_eq!(parse_hours(Some("99999999999999999999999")), MAX_HOURS);
    }

    #[test]
    fn test_three_hours_gives_four_points_ending_now() {
        // ---
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 9, 30, 0).unwrap();
        let mut rng = StdRng::seed_from_u64(1);
        let points = synthesize(3, now, &mut rng);

        assert_eq!(points.len(), 4);
        assert_eq!(points.last().unwrap().timestamp, now);
        assert_eq!(points[0].timestamp, now - Duration::hours(3));
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
    }

    #[test]
    fn test_values_stay_near_their_curves() {
        // ---
        let now = Utc::now();
        let mut rng = StdRng::seed_from_u64(2);
        for p in synthesize(48, now, &mut rng) {
            assert!((19.0..=31.0).contains(&p.temperature));
            assert!((47.5..=82.5).contains(&p.humidity));
            assert!((1002.0..=1024.0).contains(&p.pressure));
        }
    }

    #[test]
    fn test_negative_hours_is_empty() {
        // ---
        let mut rng = StdRng::seed_from_u64(3);
        assert!(synthesize(-1, Utc::now(), &mut rng).is_empty());
    }
}
