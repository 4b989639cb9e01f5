//! Timestamp formatting and ordering
//!
//! Entry timestamps are ISO 8601 text with at least microsecond precision.
//! [`MonotonicClock`] keeps the stamps handed out by one logger (and every
//! logger derived from it) non-decreasing even if the wall clock steps back.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Supported timestamp renderings
///
/// # Examples
///
/// ```
/// use ndjson_logger::TimestampFormat;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(TimestampFormat::Iso8601Micros.format(&t), "2025-01-08T10:30:45.000000Z");
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123456Z`
    #[default]
    Iso8601Micros,

    /// `2025-01-08T10:30:45.123456789Z`
    Iso8601Nanos,

    /// `2025-01-08T10:30:45.123456+00:00`
    Rfc3339Micros,
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601Micros => datetime.to_rfc3339_opts(SecondsFormat::Micros, true),
            TimestampFormat::Iso8601Nanos => datetime.to_rfc3339_opts(SecondsFormat::Nanos, true),
            TimestampFormat::Rfc3339Micros => datetime.to_rfc3339_opts(SecondsFormat::Micros, false),
        }
    }

    /// Get a description of this format
    #[must_use]
    pub fn description(&self) -> &str {
        match self {
            TimestampFormat::Iso8601Micros => "ISO 8601 with microseconds (2025-01-08T10:30:45.123456Z)",
            TimestampFormat::Iso8601Nanos => {
                "ISO 8601 with nanoseconds (2025-01-08T10:30:45.123456789Z)"
            }
            TimestampFormat::Rfc3339Micros => {
                "RFC 3339 with offset (2025-01-08T10:30:45.123456+00:00)"
            }
        }
    }
}

/// Wall clock that never goes backwards
///
/// Not synchronized on its own; the logger only touches it while holding the
/// write lock.
#[derive(Debug, Default)]
pub struct MonotonicClock {
    last: Option<DateTime<Utc>>,
}

impl MonotonicClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current time, clamped to the last value returned
    pub fn now(&mut self) -> DateTime<Utc> {
        self.observe(Utc::now())
    }

    pub(crate) fn observe(&mut self, now: DateTime<Utc>) -> DateTime<Utc> {
        let stamp = match self.last {
            Some(last) if last > now => last,
            _ => now,
        };
        self.last = Some(stamp);
        stamp
    }
}
