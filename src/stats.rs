//! Gather cycle statistics
//!
//! Lock-free counters kept per source so the binary can report how cycles went
//! without any shared mutable state beyond atomics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;

/// Thread-safe counter using atomic operations
#[derive(Debug, Default)]
pub struct Counter {
    value: AtomicU64,
}

impl Counter {
    /// Create a new counter initialized to 0
    pub fn new() -> Self {
        Self {
            value: AtomicU64::new(0),
        }
    }

    /// Increment the counter by 1
    pub fn inc(&self) {
        self.value.fetch_add(1, Ordering::Relaxed);
    }

    /// Increment the counter by a specific amount
    pub fn inc_by(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Get the current value
    pub fn get(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

/// Per-source cycle counters
#[derive(Debug, Default)]
pub struct GatherStats {
    cycles_total: Counter,
    cycle_failures_total: Counter,
    records_total: Counter,
    last_duration_ms: AtomicU64,
}

/// Point-in-time copy of [`GatherStats`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatsSnapshot {
    pub cycles_total: u64,
    pub cycle_failures_total: u64,
    pub records_total: u64,
    pub last_duration_ms: u64,
}

impl GatherStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a cycle that delivered `records` records
    pub fn record_success(&self, records: usize, duration: Duration) {
        self.cycles_total.inc();
        self.records_total.inc_by(records as u64);
        self.set_duration(duration);
    }

    /// Record a cycle that failed
    pub fn record_failure(&self, duration: Duration) {
        self.cycles_total.inc();
        self.cycle_failures_total.inc();
        self.set_duration(duration);
    }

    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            cycles_total: self.cycles_total.get(),
            cycle_failures_total: self.cycle_failures_total.get(),
            records_total: self.records_total.get(),
            last_duration_ms: self.last_duration_ms.load(Ordering::Relaxed),
        }
    }

    fn set_duration(&self, duration: Duration) {
        self.last_duration_ms
            .store(duration.as_millis() as u64, Ordering::Relaxed);
    }
}
