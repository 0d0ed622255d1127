//! Shared, live-updatable level threshold

use super::level::Level;
use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// A level cell shared between handlers and whoever controls verbosity.
///
/// Clones share the same cell. Reads are relaxed atomic loads, so a call
/// racing with [`LevelValue::set`] may still see the previous threshold.
///
/// # Example
///
/// ```
/// use pine_logger::{Level, LevelValue};
///
/// let level = LevelValue::new(Level::Debug);
/// let controller = level.clone();
/// controller.set(Level::Error);
/// assert_eq!(level.get(), Level::Error);
/// ```
#[derive(Clone)]
pub struct LevelValue {
    inner: Arc<AtomicU8>,
}

impl LevelValue {
    pub fn new(level: Level) -> Self {
        Self {
            inner: Arc::new(AtomicU8::new(level as u8)),
        }
    }

    #[inline]
    pub fn get(&self) -> Level {
        Level::from_u8(self.inner.load(Ordering::Relaxed))
    }

    pub fn set(&self, level: Level) {
        self.inner.store(level as u8, Ordering::Relaxed);
    }

    /// Whether a call at `level` passes the current threshold.
    #[inline]
    pub fn is_enabled(&self, level: Level) -> bool {
        self.get().enables(level)
    }
}

impl Default for LevelValue {
    fn default() -> Self {
        Self::new(Level::Debug)
    }
}

impl From<Level> for LevelValue {
    fn from(level: Level) -> Self {
        Self::new(level)
    }
}

impl fmt::Debug for LevelValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LevelValue").field(&self.get()).finish()
    }
}
