//! Append-only file sink

use crate::core::{LoggerError, Result, Sink};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Appends lines to a file, creating it when missing
///
/// The file is not buffered: each line reaches the operating system in one
/// `write_all`, so a reader never sees half a line from this process. With
/// the `file-lock` feature, [`FileSink::with_file_lock`] additionally holds an
/// exclusive advisory lock around each write for processes sharing the file.
pub struct FileSink {
    path: PathBuf,
    file: Option<File>,
    lock_on_write: bool,
}

impl FileSink {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|e| LoggerError::open(path.display().to_string(), e))?;

        Ok(Self {
            path,
            file: Some(file),
            lock_on_write: false,
        })
    }

    /// Hold an exclusive advisory lock on the file while writing each line
    #[cfg(feature = "file-lock")]
    #[must_use]
    pub fn with_file_lock(mut self, enabled: bool) -> Self {
        self.lock_on_write = enabled;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn file_mut(&mut self) -> Result<&mut File> {
        self.file.as_mut().ok_or(LoggerError::AlreadyClosed)
    }
}

#[cfg(feature = "file-lock")]
fn write_locked(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    use fs2::FileExt;

    file.lock_exclusive()?;
    let written = file.write_all(line);
    let unlocked = FileExt::unlock(&*file);
    written.and(unlocked)
}

#[cfg(not(feature = "file-lock"))]
fn write_locked(file: &mut File, line: &[u8]) -> std::io::Result<()> {
    file.write_all(line)
}

impl Sink for FileSink {
    fn write_line(&mut self, line: &[u8]) -> Result<()> {
        let lock = self.lock_on_write;
        let file = self.file_mut()?;
        let written = if lock {
            write_locked(file, line)
        } else {
            file.write_all(line)
        };
        written.map_err(|e| LoggerError::sink("file", e))
    }

    fn flush(&mut self) -> Result<()> {
        self.file_mut()?
            .flush()
            .map_err(|e| LoggerError::sink("file", e))
    }

    fn close(&mut self) -> Result<()> {
        let mut file = self.file.take().ok_or(LoggerError::AlreadyClosed)?;
        file.flush().map_err(|e| LoggerError::sink("file", e))?;
        file.sync_data().map_err(|e| LoggerError::sink("file", e))
    }

    fn name(&self) -> &str {
        "file"
    }
}
