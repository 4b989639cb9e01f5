//! In-memory sink

use crate::core::{LoggerError, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Collects lines in a shared buffer
///
/// Clones share the buffer, so one clone can be handed to a logger while
/// another is kept to read what was written. Closing only affects the clone
/// it is called on.
///
/// ```
/// use ndjson_logger::{LogContext, LogLevel, Logger, MemorySink};
///
/// let sink = MemorySink::new();
/// let logger = Logger::builder().sink(sink.clone()).build().unwrap();
///
/// logger.log(&LogContext::background(), LogLevel::Info, "ready");
/// assert_eq!(sink.lines().len(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MemorySink {
    buffer: Arc<Mutex<Vec<u8>>>,
    closed: bool,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.buffer.lock()).into_owned()
    }

    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }

    /// Every line parsed as JSON
    pub fn json_lines(&self) -> std::result::Result<Vec<serde_json::Value>, serde_json::Error> {
        self.lines()
            .iter()
            .map(|line| serde_json::from_str(line))
            .collect()
    }

    pub fn clear(&self) {
        self.buffer.lock().clear();
    }
}

impl Sink for MemorySink {
    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        if self.closed {
            return Err(LoggerError::AlreadyClosed);
        }
        self.buffer.lock().extend_from_slice(line);
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if self.closed {
            return Err(LoggerError::AlreadyClosed);
        }
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Err(LoggerError::AlreadyClosed);
        }
        self.closed = true;
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
