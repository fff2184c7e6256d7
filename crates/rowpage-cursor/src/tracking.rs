//! Round-trip and cache counters for one cursor.
//!
//! Keep this cheap: plain relaxed atomics, shared through an `Arc` so the
//! numbers outlive the window that produced them.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

#[derive(Default)]
pub struct FetchTracker {
    round_trips: AtomicU64,
    rows_fetched: AtomicU64,
    cache_hits: AtomicU64,
    cache_misses: AtomicU64,
    peak_retained_rows: AtomicU64,
}

/// Point-in-time copy of a [`FetchTracker`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchStats {
    pub round_trips: u64,
    pub rows_fetched: u64,
    pub cache_hits: u64,
    pub cache_misses: u64,
    pub peak_retained_rows: u64,
}

impl FetchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self, rows: usize) {
        self.round_trips.fetch_add(1, Ordering::Relaxed);
        self.rows_fetched.fetch_add(rows as u64, Ordering::Relaxed);
    }

    pub fn record_hit(&self) {
        self.cache_hits.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_miss(&self) {
        self.cache_misses.fetch_add(1, Ordering::Relaxed);
    }

    /// Record how many rows the window currently holds; updates peak if higher.
    pub fn record_retained(&self, rows: u64) {
        let mut cur = self.peak_retained_rows.load(Ordering::Relaxed);
        while rows > cur {
            match self.peak_retained_rows.compare_exchange(
                cur,
                rows,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => break,
                Err(observed) => cur = observed,
            }
        }
    }

    pub fn round_trips(&self) -> u64 {
        self.round_trips.load(Ordering::Relaxed)
    }

    pub fn snapshot(&self) -> FetchStats {
        FetchStats {
            round_trips: self.round_trips.load(Ordering::Relaxed),
            rows_fetched: self.rows_fetched.load(Ordering::Relaxed),
            cache_hits: self.cache_hits.load(Ordering::Relaxed),
            cache_misses: self.cache_misses.load(Ordering::Relaxed),
            peak_retained_rows: self.peak_retained_rows.load(Ordering::Relaxed),
        }
    }
}
