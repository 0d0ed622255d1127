//! Logger metrics for observability
//!
//! Counters shared by every logger derived from the same builder: handler
//! writes that succeeded or failed, and calls skipped because no handler
//! accepted their level.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use pine_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_write_succeeded();
/// metrics.record_write_failed();
///
/// assert_eq!(metrics.writes_succeeded(), 1);
/// assert_eq!(metrics.failure_rate(), 50.0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Handler writes that completed
    writes_succeeded: AtomicU64,

    /// Handler writes that returned an error or panicked
    writes_failed: AtomicU64,

    /// Calls dropped before building an entry
    disabled_calls: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            writes_succeeded: AtomicU64::new(0),
            writes_failed: AtomicU64::new(0),
            disabled_calls: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn writes_succeeded(&self) -> u64 {
        self.writes_succeeded.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn writes_failed(&self) -> u64 {
        self.writes_failed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn disabled_calls(&self) -> u64 {
        self.disabled_calls.load(Ordering::Relaxed)
    }

    /// Record a handler write that completed; returns the previous count
    #[inline]
    pub fn record_write_succeeded(&self) -> u64 {
        self.writes_succeeded.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failed(&self) -> u64 {
        self.writes_failed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_disabled(&self) -> u64 {
        self.disabled_calls.fetch_add(1, Ordering::Relaxed)
    }

    /// Failed writes as a percentage (0.0 - 100.0) of all handler writes
    ///
    /// Returns 0.0 if nothing has been written.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.writes_failed() as f64;
        let total = self.writes_succeeded() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.writes_succeeded.store(0, Ordering::Relaxed);
        self.writes_failed.store(0, Ordering::Relaxed);
        self.disabled_calls.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            writes_succeeded: AtomicU64::new(self.writes_succeeded()),
            writes_failed: AtomicU64::new(self.writes_failed()),
            disabled_calls: AtomicU64::new(self.disabled_calls()),
        }
    }
}
