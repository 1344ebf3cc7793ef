//! Extraction window computation
//!
//! The upstream source publishes data with a delay of `days_delay` days, so
//! the window is anchored that many days before the reference instant and
//! spans `days_export` days backwards from there.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use eyre::Result;

/// The `[start, end]` UTC range of records to request
///
/// Created fresh for every extraction and never mutated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtractionWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ExtractionWindow {
    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// True when the window has zero width (`days_export == 0`)
    pub fn is_degenerate(&self) -> bool {
        self.start >= self.end
    }

    /// Inclusive on both bounds
    pub fn contains(&self, instant: &DateTime<Utc>) -> bool {
        *instant >= self.start && *instant <= self.end
    }
}

/// Compute the extraction window relative to `reference`, or to the current
/// UTC instant when no reference is given.
///
/// `end = reference - days_delay` and `start = end - days_export`.
pub fn compute_window(
    reference: Option<DateTime<Utc>>,
    days_delay: u32,
    days_export: u32,
) -> ExtractionWindow {
    compute_window_at(reference.unwrap_or_else(Utc::now), days_delay, days_export)
}

/// Compute the extraction window for an explicit reference instant.
///
/// Offsets that would underflow the representable range saturate at the
/// earliest representable instant.
pub fn compute_window_at(
    reference: DateTime<Utc>,
    days_delay: u32,
    days_export: u32,
) -> ExtractionWindow {
    let end = days_before(reference, days_delay);
    let start = days_before(end, days_export);
    ExtractionWindow { start, end }
}

fn days_before(instant: DateTime<Utc>, days: u32) -> DateTime<Utc> {
    TimeDelta::try_days(i64::from(days))
        .and_then(|delta| instant.checked_sub_signed(delta))
        .unwrap_or(DateTime::<Utc>::MIN_UTC)
}

/// Parse a reference datetime given on the command line.
///
/// Accepts RFC 3339 (`2023-06-30T00:00:00Z`), `YYYY-MM-DD HH:MM[:SS]` and
/// `YYYY-MM-DD`; values without an offset are taken as UTC.
pub fn parse_reference_datetime(value: &str) -> Result<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    for pattern in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(value, pattern) {
            return Ok(naive.and_utc());
        }
    }
    if let Some(midnight) = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    eyre::bail!(
        "Invalid reference datetime '{}': expected RFC 3339, 'YYYY-MM-DD HH:MM' or 'YYYY-MM-DD'",
        value
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2023, 6, 30, 21, 0, 0).unwrap()
    }

    #[test]
    fn test_window_offsets() {
        let window = compute_window_at(reference(), 15, 30);

        assert_eq!(window.end(), reference() - TimeDelta::days(15));
        assert_eq!(window.start(), window.end() - TimeDelta::days(30));
        assert_eq!(window.end(), Utc.with_ymd_and_hms(2023, 6, 15, 21, 0, 0).unwrap());
        assert_eq!(window.start(), Utc.with_ymd_and_hms(2023, 5, 16, 21, 0, 0).unwrap());
        assert!(window.start() < window.end());
    }

    #[test]
    fn test_window_ordering_holds_across_offsets() {
        for days_delay in [0, 1, 15, 365] {
            for days_export in [1, 7, 30, 1000] {
                let window = compute_window_at(reference(), days_delay, days_export);
                assert!(window.start() < window.end());
                assert_eq!(window.duration(), TimeDelta::days(i64::from(days_export)));
                assert_eq!(
                    reference() - window.end(),
                    TimeDelta::days(i64::from(days_delay))
                );
            }
        }
    }

    #[test]
    fn test_zero_delay_ends_at_reference() {
        let window = compute_window_at(reference(), 0, 1);
        assert_eq!(window.end(), reference());
    }

    #[test]
    fn test_zero_export_is_degenerate_not_rejected() {
        let window = compute_window_at(reference(), 15, 0);
        assert_eq!(window.start(), window.end());
        assert!(window.is_degenerate());
        assert!(window.contains(&window.end()));
    }

    #[test]
    fn test_missing_reference_uses_now() {
        let before = Utc::now();
        let window = compute_window(None, 2, 3);
        let after = Utc::now();

        assert!(window.end() >= before - TimeDelta::days(2));
        assert!(window.end() <= after - TimeDelta::days(2));
        assert_eq!(window.duration(), TimeDelta::days(3));
    }

    #[test]
    fn test_huge_offsets_saturate() {
        let window = compute_window_at(reference(), u32::MAX, u32::MAX);
        assert_eq!(window.start(), DateTime::<Utc>::MIN_UTC);
    }

    #[test]
    fn test_contains_is_inclusive() {
        let window = compute_window_at(reference(), 0, 1);
        assert!(window.contains(&window.start()));
        assert!(window.contains(&window.end()));
        assert!(!window.contains(&(window.end() + TimeDelta::hours(1))));
        assert!(!window.contains(&(window.start() - TimeDelta::hours(1))));
    }

    #[test]
    fn test_parse_reference_datetime() {
        let expected = Utc.with_ymd_and_hms(2023, 6, 30, 21, 0, 0).unwrap();
        assert_eq!(parse_reference_datetime("2023-06-30T21:00:00Z").unwrap(), expected);
        assert_eq!(parse_reference_datetime("2023-06-30T23:00:00+02:00").unwrap(), expected);
        assert_eq!(parse_reference_datetime("2023-06-30 21:00").unwrap(), expected);
        assert_eq!(
            parse_reference_datetime("2023-06-30").unwrap(),
            Utc.with_ymd_and_hms(2023, 6, 30, 0, 0, 0).unwrap()
        );
        assert!(parse_reference_datetime("yesterday").is_err());
    }
}
