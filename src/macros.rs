//! Logging macros for ergonomic log message formatting.
//!
//! The leveled macros expand to a direct [`Logger::log`](crate::Logger::log)
//! call at the use site, so caller attribution reports the function that
//! wrote the macro.
//!
//! # Examples
//!
//! ```
//! use ndjson_logger::prelude::*;
//! use ndjson_logger::{fields, info, warn};
//!
//! let sink = MemorySink::new();
//! let logger = Logger::builder().sink(sink.clone()).build().unwrap();
//! let ctx = LogContext::background().with_fields(fields! { "request_id" => "r-9" });
//!
//! info!(logger, &ctx, "Server started");
//!
//! let port = 8080;
//! warn!(logger, &ctx, "Port {} already in use", port);
//!
//! assert_eq!(sink.lines().len(), 2);
//! ```

/// Build a [`Fields`](crate::Fields) map.
///
/// # Examples
///
/// ```
/// use ndjson_logger::{fields, FieldValue};
///
/// let fields = fields! { "user_id" => 42, "admin" => false, "tags" => vec!["a", "b"] };
/// assert_eq!(fields["user_id"], FieldValue::Int(42));
/// assert!(fields! {}.is_empty());
/// ```
#[macro_export]
macro_rules! fields {
    () => {
        $crate::Fields::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut fields = $crate::Fields::new();
        $(
            fields.insert(::std::string::String::from($key), $crate::FieldValue::from($value));
        )+
        fields
    }};
}

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use ndjson_logger::prelude::*;
/// # let logger = Logger::builder().sink(MemorySink::new()).build().unwrap();
/// # let ctx = LogContext::background();
/// use ndjson_logger::log;
/// log!(logger, &ctx, LogLevel::Info, "Simple message");
/// log!(logger, &ctx, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $ctx:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($ctx, $level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a fatal-level message and terminate the process.
///
/// Nothing after this macro runs unless the logger was built with a
/// non-exiting [`Terminator`](crate::Terminator).
///
/// # Examples
///
/// ```
/// # use ndjson_logger::prelude::*;
/// use ndjson_logger::fatal;
///
/// let terminator = RecordingTerminator::new();
/// let logger = Logger::builder()
///     .sink(MemorySink::new())
///     .terminator(terminator.clone())
///     .build()
///     .unwrap();
///
/// fatal!(logger, &LogContext::background(), "config file {} unreadable", "app.toml");
/// assert_eq!(terminator.calls(), 1);
/// ```
#[macro_export]
macro_rules! fatal {
    ($logger:expr, $ctx:expr, $($arg:tt)+) => {
        $crate::log!($logger, $ctx, $crate::LogLevel::Fatal, $($arg)+)
    };
}
