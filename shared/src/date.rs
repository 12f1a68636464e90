//! Timestamp module
//!
//! - `Timestamp`: backend `created_at` values, serialized as RFC 3339
//! - display helpers: relative ("5 minutes ago") and long
//!   ("May 1st 2025, 12:00 PM") renderings

use chrono::{DateTime, Datelike, FixedOffset, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

// =========================================================
// Timestamp
// =========================================================

/// UTC instant.
///
/// The backend writes naive UTC datetimes (`2025-05-01T12:00:00.123000`);
/// offset-qualified RFC 3339 strings are accepted as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    #[inline]
    pub const fn new(at: DateTime<Utc>) -> Self {
        Self(at)
    }

    pub fn from_millis(ms: i64) -> Option<Self> {
        DateTime::<Utc>::from_timestamp_millis(ms).map(Self)
    }

    #[inline]
    pub fn as_millis(&self) -> i64 {
        self.0.timestamp_millis()
    }

    #[inline]
    pub fn as_utc(&self) -> DateTime<Utc> {
        self.0
    }

    /// Parses RFC 3339 first, then the naive forms the backend emits.
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(Self(at.with_timezone(&Utc)));
        }
        const NAIVE_FORMATS: [&str; 3] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"];
        NAIVE_FORMATS
            .iter()
            .find_map(|f| NaiveDateTime::parse_from_str(raw, f).ok())
            .map(|naive| Self(Utc.from_utc_datetime(&naive)))
    }

    /// Relative rendering against `now`, using moment-style thresholds.
    pub fn format_relative(&self, now: Timestamp) -> String {
        let delta_secs = (now.0 - self.0).num_seconds();
        let phrase = relative_phrase(delta_secs.unsigned_abs());
        if delta_secs < 0 {
            format!("in {}", phrase)
        } else {
            format!("{} ago", phrase)
        }
    }

    /// `May 1st 2025, 12:00 PM` in the given offset.
    pub fn format_long(&self, offset: FixedOffset) -> String {
        let local = self.0.with_timezone(&offset);
        format!(
            "{} {}{} {}",
            local.format("%B"),
            local.day(),
            ordinal_suffix(local.day()),
            local.format("%Y, %-I:%M %p")
        )
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(at: DateTime<Utc>) -> Self {
        Self(at)
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_rfc3339())
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0.to_rfc3339())
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Timestamp::parse(&raw)
            .ok_or_else(|| serde::de::Error::custom(format!("invalid timestamp: {}", raw)))
    }
}

// =========================================================
// Helpers
// =========================================================

fn relative_phrase(secs: u64) -> String {
    const MINUTE: f64 = 60.0;
    const HOUR: f64 = 3600.0;
    const DAY: f64 = 86_400.0;

    let s = secs as f64;
    let minutes = (s / MINUTE).round() as u64;
    let hours = (s / HOUR).round() as u64;
    let days = (s / DAY).round() as u64;

    if secs < 45 {
        "a few seconds".to_string()
    } else if secs < 90 {
        "a minute".to_string()
    } else if minutes < 45 {
        format!("{} minutes", minutes)
    } else if minutes < 90 {
        "an hour".to_string()
    } else if hours < 22 {
        format!("{} hours", hours)
    } else if hours < 36 {
        "a day".to_string()
    } else if days < 26 {
        format!("{} days", days)
    } else if days < 46 {
        "a month".to_string()
    } else if days < 320 {
        format!("{} months", ((s / DAY) / 30.4).round() as u64)
    } else if days < 548 {
        "a year".to_string()
    } else {
        format!("{} years", ((s / DAY) / 365.0).round() as u64)
    }
}

fn ordinal_suffix(day: u32) -> &'static str {
    match (day % 10, day % 100) {
        (_, 11..=13) => "th",
        (1, _) => "st",
        (2, _) => "nd",
        (3, _) => "rd",
        _ => "th",
    }
}
