//! Run counters
//!
//! - Counters only
//! - Monotonic increase
//! - Shared by all partition jobs

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

/// Counters accumulated across every partition of a run
///
/// Uses Relaxed ordering; values are read once all jobs have joined.
#[derive(Debug, Default)]
pub struct SelectMetrics {
    /// Partitions fully written
    partitions_completed: AtomicU64,
    /// Key column rows decoded
    rows_scanned: AtomicU64,
    /// Key column rows kept
    rows_selected: AtomicU64,
    /// Column files written
    columns_written: AtomicU64,
    /// Uncompressed bytes written across all columns
    bytes_written: AtomicU64,
}

impl SelectMetrics {
    /// Create a registry with all counters at zero
    pub fn new() -> Self {
        Self::default()
    }

    pub fn increment_partitions(&self) {
        self.partitions_completed.fetch_add(1, Ordering::Relaxed);
    }

    /// Record one mask: `scanned` rows seen, `selected` kept
    pub fn add_rows(&self, scanned: u64, selected: u64) {
        self.rows_scanned.fetch_add(scanned, Ordering::Relaxed);
        self.rows_selected.fetch_add(selected, Ordering::Relaxed);
    }

    /// Record one finished column file
    pub fn add_column(&self, bytes: u64) {
        self.columns_written.fetch_add(1, Ordering::Relaxed);
        self.bytes_written.fetch_add(bytes, Ordering::Relaxed);
    }

    /// Get all counters as a snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            partitions_completed: self.partitions_completed.load(Ordering::Relaxed),
            rows_scanned: self.rows_scanned.load(Ordering::Relaxed),
            rows_selected: self.rows_selected.load(Ordering::Relaxed),
            columns_written: self.columns_written.load(Ordering::Relaxed),
            bytes_written: self.bytes_written.load(Ordering::Relaxed),
        }
    }
}

/// A point-in-time copy of all counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MetricsSnapshot {
    pub partitions_completed: u64,
    pub rows_scanned: u64,
    pub rows_selected: u64,
    pub columns_written: u64,
    pub bytes_written: u64,
}
