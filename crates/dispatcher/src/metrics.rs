//! Sink metrics for observability

use std::sync::atomic::{AtomicU64, Ordering};

/// Dispatch counters for a single sink
#[derive(Debug, Default)]
pub struct SinkMetrics {
    /// Events rendered and written
    written: AtomicU64,
    /// Events skipped by the severity threshold
    filtered: AtomicU64,
    /// Render or write failures
    failed: AtomicU64,
}

impl SinkMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    pub fn inc_written(&self) {
        self.written.fetch_add(1, Ordering::Relaxed);
    }

    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    pub fn inc_filtered(&self) {
        self.filtered.fetch_add(1, Ordering::Relaxed);
    }

    pub fn failed(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    pub fn inc_failed(&self) {
        self.failed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of all counters
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            written: self.written(),
            filtered: self.filtered(),
            failed: self.failed(),
        }
    }
}

/// Snapshot of sink metrics (for reporting)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub written: u64,
    pub filtered: u64,
    pub failed: u64,
}

impl MetricsSnapshot {
    /// Events that reached the sink, whatever the outcome
    pub fn total(&self) -> u64 {
        self.written + self.filtered + self.failed
    }
}
