//! Network transports used by remote handlers

pub mod tcp;

pub use tcp::{TcpWriter, DEFAULT_MAX_RECONNECT, DEFAULT_RECONNECT_DELAY, DEFAULT_WRITE_TIMEOUT};

use crate::core::Result;

/// A byte-frame sink that knows nothing about logging.
pub trait Transport: Send + Sync {
    /// Deliver one complete frame.
    fn send(&self, payload: &[u8]) -> Result<()>;

    /// Release the connection. Calling it again is a no-op.
    fn close(&self) -> Result<()>;
}
