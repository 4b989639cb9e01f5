//! Core logger types and traits

pub mod caller;
pub mod error;
pub mod event_id;
pub mod log_context;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod sink;
pub mod terminator;
pub mod timestamp;

pub use caller::{BacktraceResolver, Caller, CallerResolver, NoopResolver, CALLER_DEPTH};
pub use error::{LoggerError, Result};
pub use event_id::EventId;
pub use log_context::{resolve, FieldValue, Fields, LogContext, FIELDS_KEY};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use metrics::LoggerMetrics;
pub use sink::Sink;
pub use terminator::{ProcessExit, RecordingTerminator, Terminator, FATAL_EXIT_CODE};
pub use timestamp::{MonotonicClock, TimestampFormat};
