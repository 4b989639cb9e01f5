//! Main logger implementation

use super::{
    caller::{BacktraceResolver, CallerResolver, CALLER_DEPTH},
    error::{LoggerError, Result},
    event_id::EventId,
    log_context::{resolve, Fields, LogContext},
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::Sink,
    terminator::{ProcessExit, Terminator, FATAL_EXIT_CODE},
    timestamp::{MonotonicClock, TimestampFormat},
};
use crate::sinks::FileSink;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Sinks plus everything that must change under the write lock
struct SinkState {
    sinks: Vec<Box<dyn Sink>>,
    clock: MonotonicClock,
    closed: bool,
}

/// State shared by a logger and every logger derived from it
struct Shared {
    state: Mutex<SinkState>,
    resolver: Box<dyn CallerResolver>,
    terminator: Box<dyn Terminator>,
    timestamp_format: TimestampFormat,
    event_id: EventId,
    metrics: LoggerMetrics,
}

/// NDJSON logger handle
///
/// Cloning a `Logger` or deriving one with [`Logger::with_fields`] yields a
/// handle onto the same sinks and the same write lock, so lines from all of
/// them are totally ordered and never interleave.
///
/// After [`Logger::close`], emission calls on any handle are silent no-ops
/// that only increment [`LoggerMetrics::dropped_count`]. A `Fatal` emission
/// still terminates the process in that state.
///
/// An entry that cannot be serialized (a NaN or infinite duration) is
/// reported on stderr and counted in
/// [`LoggerMetrics::serialization_failures`]; nothing is written and a
/// `Fatal` emission in that case does not terminate.
///
/// # Example
///
/// ```no_run
/// use ndjson_logger::{fields, LogContext, LogLevel, Logger};
///
/// let logger = Logger::new("app.log")?;
/// let service = logger.with_fields(fields! { "service" => "billing" });
///
/// let ctx = LogContext::background().with_fields(fields! { "request_id" => "r-1" });
/// service.log(&ctx, LogLevel::Info, "invoice settled");
/// service.log_http(&ctx, LogLevel::Warn, "upstream slow", 504, 2.5);
///
/// logger.close()?;
/// # Ok::<(), ndjson_logger::LoggerError>(())
/// ```
#[derive(Clone)]
pub struct Logger {
    shared: Arc<Shared>,
    defaults: Arc<Fields>,
}

impl Logger {
    /// Open `path` for appending (creating it if needed) and log to it.
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        Self::builder().path(path.as_ref()).build()
    }

    /// Derive a logger whose defaults are this logger's overlaid by `extra`.
    ///
    /// The receiver is unchanged; both share sinks and lock.
    #[must_use]
    pub fn with_fields(&self, extra: Fields) -> Self {
        let mut defaults = (*self.defaults).clone();
        defaults.extend(extra);
        Self {
            shared: Arc::clone(&self.shared),
            defaults: Arc::new(defaults),
        }
    }

    /// Default attributes attached to every entry of this handle
    pub fn defaults(&self) -> &Fields {
        &self.defaults
    }

    /// Emit one entry without HTTP details.
    #[inline(never)]
    pub fn log(&self, ctx: &LogContext, level: LogLevel, message: impl Into<String>) {
        self.emit(ctx, level, message.into(), 0, 0.0);
        // keeps this frame on the stack (no sibling-call optimization)
        std::hint::black_box(());
    }

    /// Emit one entry carrying an HTTP status code and a duration in seconds.
    ///
    /// Zero values are omitted from the line, exactly like in [`Logger::log`].
    #[inline(never)]
    pub fn log_http(
        &self,
        ctx: &LogContext,
        level: LogLevel,
        message: impl Into<String>,
        code: u16,
        duration_secs: f64,
    ) {
        self.emit(ctx, level, message.into(), code, duration_secs);
        std::hint::black_box(());
    }

    /// [`Logger::log_http`] taking the elapsed time as a `Duration`
    #[inline(never)]
    pub fn log_request(
        &self,
        ctx: &LogContext,
        level: LogLevel,
        message: impl Into<String>,
        code: u16,
        elapsed: Duration,
    ) {
        self.emit(ctx, level, message.into(), code, elapsed.as_secs_f64());
        std::hint::black_box(());
    }

    /// Shared emission path.
    ///
    /// Must be called directly from a public entry point: attribution reads
    /// the frame [`CALLER_DEPTH`] levels above the resolver.
    #[inline(never)]
    fn emit(&self, ctx: &LogContext, level: LogLevel, message: String, code: u16, duration: f64) {
        let shared = &*self.shared;
        let caller = shared.resolver.resolve(CALLER_DEPTH);
        let attributes = resolve(&self.defaults, Some(ctx));
        let mut encoded = true;

        {
            let mut state = shared.state.lock();
            if state.closed {
                shared.metrics.record_dropped();
            } else {
                let now = state.clock.now();
                let entry = LogEntry::new(
                    shared.event_id.render(&now),
                    level,
                    caller,
                    message,
                    shared.timestamp_format.format(&now),
                )
                .with_http(code, duration)
                .with_attributes(attributes);

                match entry.to_json() {
                    Ok(mut line) => {
                        line.push('\n');
                        Self::write_line(&mut state.sinks, line.as_bytes(), &shared.metrics);
                    }
                    Err(e) => {
                        eprintln!("[LOGGER ERROR] Could not serialize log entry: {}", e);
                        shared.metrics.record_serialization_failure();
                        encoded = false;
                    }
                }
            }
        }

        // A closed logger still terminates; an entry that cannot be encoded
        // is reported and returns like any other level.
        if level.is_terminal() && encoded {
            shared.terminator.terminate(FATAL_EXIT_CODE);
        }
    }

    /// Hand one line to every sink and flush it.
    ///
    /// A failing sink does not stop the others from receiving the line.
    fn write_line(sinks: &mut [Box<dyn Sink>], line: &[u8], metrics: &LoggerMetrics) {
        let mut has_error = false;

        for (idx, sink) in sinks.iter_mut().enumerate() {
            if let Err(e) = sink.write_line(line).and_then(|()| sink.flush()) {
                eprintln!("[LOGGER ERROR] Sink #{} ({}) failed: {}", idx, sink.name(), e);
                metrics.record_sink_error();
                has_error = true;
            }
        }

        if has_error {
            metrics.record_dropped();
        } else {
            metrics.record_written();
        }
    }

    /// Flush every sink.
    pub fn flush(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.closed {
            return Err(LoggerError::AlreadyClosed);
        }
        for sink in state.sinks.iter_mut() {
            sink.flush()?;
        }
        Ok(())
    }

    /// Flush and release every sink.
    ///
    /// Waits for an in-flight write to finish. Closing affects every handle
    /// sharing the sinks. A second call returns [`LoggerError::AlreadyClosed`].
    /// If several sinks fail to close, the first error is returned and the
    /// rest are reported on stderr.
    pub fn close(&self) -> Result<()> {
        let mut state = self.shared.state.lock();
        if state.closed {
            return Err(LoggerError::AlreadyClosed);
        }
        state.closed = true;

        let mut first_error = None;
        for (idx, mut sink) in std::mem::take(&mut state.sinks).into_iter().enumerate() {
            if let Err(e) = sink.close() {
                if first_error.is_none() {
                    first_error = Some(e);
                } else {
                    eprintln!("[LOGGER ERROR] Sink #{} ({}) failed to close: {}", idx, sink.name(), e);
                }
            }
        }

        match first_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.shared.state.lock().closed
    }

    /// Get the logger metrics, shared with every derived handle
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.shared.metrics
    }

    /// Create a builder for Logger
    ///
    /// # Example
    /// ```
    /// use ndjson_logger::prelude::*;
    ///
    /// let logger = Logger::builder()
    ///     .sink(MemorySink::new())
    ///     .caller_resolver(NoopResolver)
    ///     .event_id(EventId::Process)
    ///     .build()
    ///     .unwrap();
    /// # drop(logger);
    /// ```
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }
}

impl std::fmt::Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger")
            .field("defaults", &self.defaults)
            .field("timestamp_format", &self.shared.timestamp_format)
            .field("event_id", &self.shared.event_id)
            .finish_non_exhaustive()
    }
}

impl Drop for Shared {
    fn drop(&mut self) {
        let state = self.state.get_mut();
        if state.closed {
            return;
        }

        // Ensure everything written is handed to the destinations
        for (idx, sink) in state.sinks.iter_mut().enumerate() {
            if let Err(e) = sink.flush() {
                eprintln!("[LOGGER ERROR] Failed to flush sink #{} ({}) during shutdown: {}", idx, sink.name(), e);
            }
        }

        let dropped = self.metrics.dropped_count();
        if dropped > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} dropped logs (drop rate: {:.2}%)",
                dropped,
                self.metrics.drop_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// Defaults: [`BacktraceResolver`], [`ProcessExit`],
/// [`TimestampFormat::Iso8601Micros`], [`EventId::Timestamp`], no default
/// fields. At least one path or sink is required.
pub struct LoggerBuilder {
    paths: Vec<PathBuf>,
    sinks: Vec<Box<dyn Sink>>,
    #[cfg_attr(not(feature = "file-lock"), allow(dead_code))]
    file_lock: bool,
    resolver: Box<dyn CallerResolver>,
    terminator: Box<dyn Terminator>,
    timestamp_format: TimestampFormat,
    event_id: EventId,
    defaults: Fields,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            paths: Vec::new(),
            sinks: Vec::new(),
            file_lock: false,
            resolver: Box::new(BacktraceResolver),
            terminator: Box::new(ProcessExit),
            timestamp_format: TimestampFormat::default(),
            event_id: EventId::default(),
            defaults: Fields::new(),
        }
    }

    /// Append to the file at `path`; opened by [`LoggerBuilder::build`]
    #[must_use = "builder methods return a new value"]
    pub fn path(mut self, path: impl Into<PathBuf>) -> Self {
        self.paths.push(path.into());
        self
    }

    /// Add a sink; every line goes to every sink
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }

    /// Hold an advisory lock on each file configured with
    /// [`LoggerBuilder::path`] while writing
    #[cfg(feature = "file-lock")]
    #[must_use = "builder methods return a new value"]
    pub fn file_lock(mut self, enabled: bool) -> Self {
        self.file_lock = enabled;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn caller_resolver<R: CallerResolver + 'static>(mut self, resolver: R) -> Self {
        self.resolver = Box::new(resolver);
        self
    }

    /// Replace what happens after a `Fatal` entry is written
    #[must_use = "builder methods return a new value"]
    pub fn terminator<T: Terminator + 'static>(mut self, terminator: T) -> Self {
        self.terminator = Box::new(terminator);
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn event_id(mut self, event_id: EventId) -> Self {
        self.event_id = event_id;
        self
    }

    /// Default fields of the root logger
    #[must_use = "builder methods return a new value"]
    pub fn fields(mut self, fields: Fields) -> Self {
        self.defaults.extend(fields);
        self
    }

    /// Open every configured path and build the Logger
    pub fn build(self) -> Result<Logger> {
        if self.paths.is_empty() && self.sinks.is_empty() {
            return Err(LoggerError::config("LoggerBuilder", "no path or sink configured"));
        }

        let mut sinks = Vec::with_capacity(self.paths.len() + self.sinks.len());
        for path in &self.paths {
            let sink = FileSink::open(path)?;
            #[cfg(feature = "file-lock")]
            let sink = sink.with_file_lock(self.file_lock);
            sinks.push(Box::new(sink) as Box<dyn Sink>);
        }
        sinks.extend(self.sinks);

        let shared = Shared {
            state: Mutex::new(SinkState {
                sinks,
                clock: MonotonicClock::new(),
                closed: false,
            }),
            resolver: self.resolver,
            terminator: self.terminator,
            timestamp_format: self.timestamp_format,
            event_id: self.event_id,
            metrics: LoggerMetrics::new(),
        };

        Ok(Logger {
            shared: Arc::new(shared),
            defaults: Arc::new(self.defaults),
        })
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}
