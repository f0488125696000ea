// src/ingest/recency.rs
//! Recency gate. Provider timestamps are normalized to a UTC instant first;
//! anything that cannot be normalized is treated as stale.

use chrono::{DateTime, Duration, NaiveDateTime, TimeZone, Utc};
use time::{format_description::well_known::Rfc2822, OffsetDateTime};

/// Freshness window per source: near-real-time boards use an hour, slower ones a day or a week.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Window {
    Hour,
    Day,
    Week,
}

impl Window {
    pub fn duration(self) -> Duration {
        match self {
            Window::Hour => Duration::hours(1),
            Window::Day => Duration::hours(24),
            Window::Week => Duration::days(7),
        }
    }
}

/// Raw timestamp as delivered by a provider.
#[derive(Debug, Clone, PartialEq)]
pub enum RawTimestamp<'a> {
    Text(&'a str),
    EpochSeconds(i64),
    EpochMillis(i64),
}

impl RawTimestamp<'_> {
    pub fn to_instant(&self) -> Option<DateTime<Utc>> {
        match self {
            RawTimestamp::Text(s) => parse_text(s),
            RawTimestamp::EpochSeconds(secs) => Utc.timestamp_opt(*secs, 0).single(),
            RawTimestamp::EpochMillis(ms) => Utc.timestamp_millis_opt(*ms).single(),
        }
    }
}

/// RFC 3339, naive ISO-8601 (read as UTC), then RFC 2822.
pub fn parse_text(s: &str) -> Option<DateTime<Utc>> {
    let s = s.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(naive.and_utc());
        }
    }
    parse_rfc2822(s).or_else(|| {
        DateTime::parse_from_rfc2822(s)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    })
}

fn parse_rfc2822(s: &str) -> Option<DateTime<Utc>> {
    let dt = OffsetDateTime::parse(s, &Rfc2822).ok()?;
    let nanos = dt.unix_timestamp_nanos();
    let secs = i64::try_from(nanos.div_euclid(1_000_000_000)).ok()?;
    let sub = u32::try_from(nanos.rem_euclid(1_000_000_000)).ok()?;
    Utc.timestamp_opt(secs, sub).single()
}

/// Closed interval: exactly `now - window` is still recent.
pub fn is_recent(ts: DateTime<Utc>, now: DateTime<Utc>, window: Window) -> bool {
    now.signed_duration_since(ts) <= window.duration()
}

/// `None` (unparsable or absent) is never recent.
pub fn is_recent_opt(ts: Option<DateTime<Utc>>, now: DateTime<Utc>, window: Window) -> bool {
    ts.is_some_and(|t| is_recent(t, now, window))
}

pub fn is_recent_raw(raw: &RawTimestamp<'_>, now: DateTime<Utc>, window: Window) -> bool {
    is_recent_opt(raw.to_instant(), now, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_supported_text_shapes() {
        let want = Utc.with_ymd_and_hms(2025, 6, 10, 9, 15, 0).unwrap();
        assert_eq!(parse_text("2025-06-10T09:15:00Z"), Some(want));
        assert_eq!(parse_text("2025-06-10T11:15:00+02:00"), Some(want));
        assert_eq!(parse_text("2025-06-10T09:15:00"), Some(want));
        assert_eq!(parse_text("2025-06-10 09:15:00"), Some(want));
        assert_eq!(parse_text("Tue, 10 Jun 2025 09:15:00 GMT"), Some(want));
        assert_eq!(parse_text("Tue, 10 Jun 2025 09:15:00 +0000"), Some(want));
    }

    #[test]
    fn garbage_is_none() {
        assert_eq!(parse_text(""), None);
        assert_eq!(parse_text("yesterday"), None);
        assert_eq!(parse_text("2025-13-40"), None);
    }

    #[test]
    fn epoch_units() {
        let want = Utc.with_ymd_and_hms(2025, 6, 10, 9, 15, 0).unwrap();
        let secs = want.timestamp();
        assert_eq!(RawTimestamp::EpochSeconds(secs).to_instant(), Some(want));
        assert_eq!(
            RawTimestamp::EpochMillis(secs * 1000).to_instant(),
            Some(want)
        );
    }

    #[test]
    fn future_timestamps_count_as_recent() {
        let now = Utc.with_ymd_and_hms(2025, 6, 10, 9, 0, 0).unwrap();
        assert!(is_recent(now + Duration::minutes(5), now, Window::Hour));
    }
}
