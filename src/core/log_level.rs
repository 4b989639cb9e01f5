//! Log level definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Name rendered for any numeric level outside the declared range
pub const UNKNOWN_LEVEL: &str = "UNKNOWN";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[derive(Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    Debug = 0,
    #[default]
    Info = 1,
    Warn = 2,
    Error = 3,
    Fatal = 4,
}

impl LogLevel {
    pub const ALL: [LogLevel; 5] = [
        LogLevel::Debug,
        LogLevel::Info,
        LogLevel::Warn,
        LogLevel::Error,
        LogLevel::Fatal,
    ];

    pub fn to_str(&self) -> &'static str {
        match self {
            LogLevel::Debug => "DEBUG",
            LogLevel::Info => "INFO",
            LogLevel::Warn => "WARN",
            LogLevel::Error => "ERROR",
            LogLevel::Fatal => "FATAL",
        }
    }

    /// Canonical name for a raw numeric level.
    ///
    /// Total over `i64`: anything that is not a declared level renders as
    /// `"UNKNOWN"`.
    ///
    /// ```
    /// use ndjson_logger::LogLevel;
    ///
    /// assert_eq!(LogLevel::name_of(2), "WARN");
    /// assert_eq!(LogLevel::name_of(42), "UNKNOWN");
    /// assert_eq!(LogLevel::name_of(-1), "UNKNOWN");
    /// ```
    pub fn name_of(raw: i64) -> &'static str {
        LogLevel::try_from(raw)
            .map(|level| level.to_str())
            .unwrap_or(UNKNOWN_LEVEL)
    }

    /// Whether emitting at this level ends the process
    #[inline]
    pub fn is_terminal(&self) -> bool {
        matches!(self, LogLevel::Fatal)
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_str())
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "DEBUG" => Ok(LogLevel::Debug),
            "INFO" => Ok(LogLevel::Info),
            "WARN" | "WARNING" => Ok(LogLevel::Warn),
            "ERROR" => Ok(LogLevel::Error),
            "FATAL" => Ok(LogLevel::Fatal),
            _ => Err(format!("Invalid log level: '{}'", s)),
        }
    }
}

impl TryFrom<i64> for LogLevel {
    type Error = i64;

    // `Self::Error` would collide with the `Error` variant
    fn try_from(raw: i64) -> Result<Self, i64> {
        match raw {
            0 => Ok(LogLevel::Debug),
            1 => Ok(LogLevel::Info),
            2 => Ok(LogLevel::Warn),
            3 => Ok(LogLevel::Error),
            4 => Ok(LogLevel::Fatal),
            other => Err(other),
        }
    }
}
