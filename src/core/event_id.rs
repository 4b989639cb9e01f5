//! Value written to the `pid` field of every entry

use chrono::{DateTime, Utc};

/// How the `pid` field is filled
///
/// ```
/// use ndjson_logger::EventId;
/// use chrono::{TimeZone, Utc};
///
/// let t = Utc.with_ymd_and_hms(2025, 1, 8, 10, 30, 45).unwrap();
/// assert_eq!(EventId::Timestamp.render(&t), "20250108103045");
/// assert_eq!(EventId::Fixed("api-1".into()).render(&t), "api-1");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EventId {
    /// Entry time as `YYYYMMDDhhmmss` (UTC)
    #[default]
    Timestamp,

    /// Operating-system process id
    Process,

    /// Constant identifier, e.g. an instance name
    Fixed(String),
}

impl EventId {
    pub fn render(&self, timestamp: &DateTime<Utc>) -> String {
        match self {
            EventId::Timestamp => timestamp.format("%Y%m%d%H%M%S").to_string(),
            EventId::Process => std::process::id().to_string(),
            EventId::Fixed(id) => id.clone(),
        }
    }
}
