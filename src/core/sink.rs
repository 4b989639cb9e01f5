//! Sink trait for log output destinations

use super::error::Result;

/// Destination for serialized lines
///
/// Every call to `write_line` receives one complete line including its `\n`
/// terminator and must hand it to the destination as a single write. The
/// logger serializes all calls behind its own lock.
pub trait Sink: Send {
    fn write_line(&mut self, line: &[u8]) -> Result<()>;
    fn flush(&mut self) -> Result<()>;

    /// Release the destination. A second call reports
    /// [`LoggerError::AlreadyClosed`](super::error::LoggerError::AlreadyClosed).
    fn close(&mut self) -> Result<()>;
    fn name(&self) -> &str;
}
