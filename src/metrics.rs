//! Atomic delivery counters. Never reset during a process lifetime.

use std::sync::atomic::{AtomicU64, Ordering};

use crate::levels::{LEVEL_COUNT, Level};

/// Counters tracking accepted and discarded records. `total` always equals
/// the sum of the per-level counters; both are bumped at acceptance, not at
/// delivery. `dropped` covers queue overflow and residual records discarded
/// at shutdown.
#[derive(Debug, Default)]
pub(crate) struct Metrics {
    total: AtomicU64,
    dropped: AtomicU64,
    per_level: [AtomicU64; LEVEL_COUNT],
}

impl Metrics {
    pub fn record_accepted(&self, level: Level) {
        self.total.fetch_add(1, Ordering::Relaxed);
        self.per_level[level.index()].fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_dropped(&self, count: u64) {
        self.dropped.fetch_add(count, Ordering::Relaxed);
    }

    pub fn total(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }

    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    pub fn level(&self, level: Level) -> u64 {
        self.per_level[level.index()].load(Ordering::Relaxed)
    }
}
