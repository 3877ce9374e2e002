//! Client statistics

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters shared by every fetch issued through one client.
#[derive(Debug, Default)]
pub struct ClientStats {
    /// Fetches started
    pub fetches_total: AtomicU64,
    /// Fetches whose body was fully received
    pub fetches_completed: AtomicU64,
    /// Fetches that ended with an error other than timeout or cancellation
    pub fetches_failed: AtomicU64,
    pub fetches_timed_out: AtomicU64,
    pub fetches_cancelled: AtomicU64,
    /// Connection attempts launched across all fetches
    pub attempts_launched: AtomicU64,
    /// Body bytes delivered to callers
    pub bytes_received: AtomicU64,
}

/// Point-in-time copy of [`ClientStats`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClientStatsSnapshot {
    pub fetches_total: u64,
    pub fetches_completed: u64,
    pub fetches_failed: u64,
    pub fetches_timed_out: u64,
    pub fetches_cancelled: u64,
    pub attempts_launched: u64,
    pub bytes_received: u64,
}

impl ClientStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_fetch(&self) {
        self.fetches_total.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_completed(&self) {
        self.fetches_completed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.fetches_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_timed_out(&self) {
        self.fetches_timed_out.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cancelled(&self) {
        self.fetches_cancelled.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_attempts(&self, count: usize) {
        self.attempts_launched
            .fetch_add(count as u64, Ordering::Relaxed);
    }

    pub fn record_bytes_received(&self, bytes: u64) {
        self.bytes_received.fetch_add(bytes, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> ClientStatsSnapshot {
        ClientStatsSnapshot {
            fetches_total: self.fetches_total.load(Ordering::Relaxed),
            fetches_completed: self.fetches_completed.load(Ordering::Relaxed),
            fetches_failed: self.fetches_failed.load(Ordering::Relaxed),
            fetches_timed_out: self.fetches_timed_out.load(Ordering::Relaxed),
            fetches_cancelled: self.fetches_cancelled.load(Ordering::Relaxed),
            attempts_launched: self.attempts_launched.load(Ordering::Relaxed),
            bytes_received: self.bytes_received.load(Ordering::Relaxed),
        }
    }
}
