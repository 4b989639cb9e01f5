//! Sink over any `std::io::Write`

use crate::core::{LoggerError, Result, Sink};
use std::io::{self, Write};

/// Writes lines to an arbitrary writer, e.g. standard output or a socket
///
/// The writer is flushed after every line by the logger, so wrapping it in a
/// `BufWriter` only batches the bytes of a single line.
pub struct WriterSink<W: Write + Send> {
    name: String,
    writer: Option<W>,
}

impl<W: Write + Send> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self::named("writer", writer)
    }

    pub fn named(name: impl Into<String>, writer: W) -> Self {
        Self {
            name: name.into(),
            writer: Some(writer),
        }
    }

    fn writer_mut(&mut self) -> Result<&mut W> {
        self.writer.as_mut().ok_or(LoggerError::AlreadyClosed)
    }
}

impl WriterSink<io::Stdout> {
    pub fn stdout() -> Self {
        Self::named("stdout", io::stdout())
    }
}

impl WriterSink<io::Stderr> {
    pub fn stderr() -> Self {
        Self::named("stderr", io::stderr())
    }
}

impl<W: Write + Send> Sink for WriterSink<W> {
    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        let name = self.name.clone();
        self.writer_mut()?
            .write_all(line)
            .map_err(|e| LoggerError::sink(name, e))
    }

    fn flush(&mut self) -> Result<()> {
        let name = self.name.clone();
        self.writer_mut()?
            .flush()
            .map_err(|e| LoggerError::sink(name, e))
    }

    fn close(&mut self) -> Result<()> {
        let mut writer = self.writer.take().ok_or(LoggerError::AlreadyClosed)?;
        writer.flush().map_err(|e| LoggerError::sink(self.name.clone(), e))
    }

    fn name(&self) -> &str {
        &self.name
    }
}
