//! Handler trait for log output destinations

use super::{entry::Entry, error::Result, level::Level};

/// A sink with its own level filter and encoder.
///
/// The logger calls `write` with its write lock held, so implementations
/// only need their own locking for state shared with clones outside the
/// logger family.
pub trait Handler: Send + Sync {
    /// Whether a call at `level` should reach this handler.
    fn is_enabled(&self, level: Level) -> bool;

    fn write(&self, entry: &Entry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn close(&self) -> Result<()> {
        Ok(())
    }

    /// Copy for a derived logger: encoder config is copied, the level cell
    /// and the sink are shared.
    fn clone_handler(&self) -> Box<dyn Handler>;

    fn name(&self) -> &str;
}
