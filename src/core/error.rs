//! Error types for the logger system

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// Level text that does not name a level
    #[error("invalid level: {0:?}")]
    InvalidLevel(String),

    /// The sink accepted fewer bytes than supplied
    #[error("bad write ({written}/{expected})")]
    ShortWrite { written: usize, expected: usize },

    /// Every write attempt failed, the last re-dial succeeded
    #[error("maximum reconnection attempts ({attempts}) reached; giving up: {source}")]
    ReconnectExhausted {
        attempts: u32,
        #[source]
        source: std::io::Error,
    },

    /// A write failed and the re-dial after it failed too
    #[error("write failed: {write}; reconnection failed: {dial}")]
    ReconnectFailed {
        write: std::io::Error,
        #[source]
        dial: std::io::Error,
    },

    /// Write attempted on a transport that was closed
    #[error("transport is closed")]
    TransportClosed,

    /// A handler panicked while writing
    #[error("handler '{handler}' panicked: {message}")]
    HandlerPanicked { handler: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an invalid level error
    pub fn invalid_level(text: impl Into<String>) -> Self {
        LoggerError::InvalidLevel(text.into())
    }

    /// Create a short write error
    pub fn short_write(written: usize, expected: usize) -> Self {
        LoggerError::ShortWrite { written, expected }
    }

    /// Create a handler panic error
    pub fn handler_panicked(handler: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::HandlerPanicked {
            handler: handler.into(),
            message: message.into(),
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
