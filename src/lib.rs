//! # NDJSON Logger
//!
//! A synchronous structured logger that writes one JSON object per line.
//!
//! ## Features
//!
//! - **Leveled**: Debug, Info, Warn, Error and Fatal (which ends the process)
//! - **Attributed**: Every line names the module and function that logged it
//! - **Context-aware**: Per-call context fields override per-logger defaults
//! - **HTTP events**: Optional status code and duration fields
//! - **Thread safe**: One lock per sink set; lines never interleave
//!
//! ## Example
//!
//! ```no_run
//! use ndjson_logger::prelude::*;
//! use ndjson_logger::fields;
//!
//! let logger = Logger::new("app.log")?;
//! let ctx = LogContext::background().with_fields(fields! { "user_id" => "1234" });
//! logger.log(&ctx, LogLevel::Info, "Application started successfully");
//! logger.close()?;
//! # Ok::<(), LoggerError>(())
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        BacktraceResolver, Caller, CallerResolver, EventId, FieldValue, Fields, LogContext,
        LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, NoopResolver,
        ProcessExit, RecordingTerminator, Result, Sink, Terminator, TimestampFormat,
    };
    pub use crate::sinks::{FileSink, MemorySink, WriterSink};
}

pub use crate::core::{
    resolve, BacktraceResolver, Caller, CallerResolver, EventId, FieldValue, Fields, LogContext,
    LogEntry, LogLevel, Logger, LoggerBuilder, LoggerError, LoggerMetrics, MonotonicClock,
    NoopResolver, ProcessExit, RecordingTerminator, Result, Sink, Terminator, TimestampFormat,
    CALLER_DEPTH, FATAL_EXIT_CODE, FIELDS_KEY,
};
pub use sinks::{FileSink, MemorySink, WriterSink};
