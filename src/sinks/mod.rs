//! Sink implementations

pub mod file;
pub mod memory;
pub mod writer;

pub use file::FileSink;
pub use memory::MemorySink;
pub use writer::WriterSink;

pub use crate::core::Sink;
