//! Emission metrics for observability
//!
//! Counts what happened to each log call an engine received: written, filtered by
//! level, suppressed by an exclusion rule, and how many caller lookups were performed.

use std::sync::atomic::{AtomicU64, Ordering};

/// Per-engine emission counters
///
/// # Example
///
/// ```
/// use rust_context_logger::EmissionMetrics;
///
/// let metrics = EmissionMetrics::new();
///
/// metrics.record_emitted();
/// metrics.record_filtered();
///
/// assert_eq!(metrics.emitted(), 1);
/// assert_eq!(metrics.filtered(), 1);
/// assert_eq!(metrics.total_calls(), 2);
/// ```
#[derive(Debug)]
pub struct EmissionMetrics {
    /// Calls dispatched to a writer
    emitted: AtomicU64,

    /// Calls dropped because their level was below the writer's threshold
    filtered: AtomicU64,

    /// Calls dropped by an exclusion rule
    suppressed: AtomicU64,

    /// Stack walks performed to resolve the caller location
    caller_lookups: AtomicU64,
}

impl EmissionMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            suppressed: AtomicU64::new(0),
            caller_lookups: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn suppressed(&self) -> u64 {
        self.suppressed.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn caller_lookups(&self) -> u64 {
        self.caller_lookups.load(Ordering::Relaxed)
    }

    /// Calls received, whatever their outcome
    pub fn total_calls(&self) -> u64 {
        self.emitted() + self.filtered() + self.suppressed()
    }

    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_suppressed(&self) -> u64 {
        self.suppressed.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_caller_lookup(&self) -> u64 {
        self.caller_lookups.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all metrics to zero
    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.suppressed.store(0, Ordering::Relaxed);
        self.caller_lookups.store(0, Ordering::Relaxed);
    }
}

impl Default for EmissionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
