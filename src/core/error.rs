//! Error types for the logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// The log destination could not be opened for appending
    #[error("Failed to open log destination '{path}': {source}")]
    Open {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Logger (and every sink it owns) was already closed
    #[error("Logger already closed")]
    AlreadyClosed,

    /// A specific sink failed
    #[error("Sink '{sink}' failed: {source}")]
    Sink {
        sink: String,
        #[source]
        source: std::io::Error,
    },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an open failure for the given destination
    pub fn open(path: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Open {
            path: path.into(),
            source,
        }
    }

    /// Create a sink failure
    pub fn sink(sink: impl Into<String>, source: std::io::Error) -> Self {
        LoggerError::Sink {
            sink: sink.into(),
            source,
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
