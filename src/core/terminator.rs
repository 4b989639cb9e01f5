//! Process termination after a fatal entry

use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
use std::sync::Arc;

/// Exit status used after a fatal entry
pub const FATAL_EXIT_CODE: i32 = 1;

/// Ends the process once a fatal entry has been written.
///
/// The logger calls this outside its write lock, after the fatal line has
/// been flushed.
pub trait Terminator: Send + Sync {
    fn terminate(&self, code: i32);
}

/// Calls `std::process::exit`
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessExit;

impl Terminator for ProcessExit {
    fn terminate(&self, code: i32) {
        std::process::exit(code);
    }
}

/// Records termination requests instead of exiting
///
/// Clones share one counter.
///
/// ```
/// use ndjson_logger::{RecordingTerminator, Terminator};
///
/// let terminator = RecordingTerminator::new();
/// terminator.clone().terminate(1);
/// assert_eq!(terminator.calls(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct RecordingTerminator {
    calls: Arc<AtomicUsize>,
    last_code: Arc<AtomicI32>,
}

impl RecordingTerminator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Exit status of the most recent request, if any
    pub fn last_code(&self) -> Option<i32> {
        if self.calls() == 0 {
            return None;
        }
        Some(self.last_code.load(Ordering::SeqCst))
    }
}

impl Terminator for RecordingTerminator {
    fn terminate(&self, code: i32) {
        self.last_code.store(code, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_terminator() {
        let terminator = RecordingTerminator::new();
        assert_eq!(terminator.calls(), 0);
        assert_eq!(terminator.last_code(), None);

        terminator.terminate(FATAL_EXIT_CODE);
        terminator.terminate(FATAL_EXIT_CODE);

        assert_eq!(terminator.calls(), 2);
        assert_eq!(terminator.last_code(), Some(FATAL_EXIT_CODE));
    }
}
