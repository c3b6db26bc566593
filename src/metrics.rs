//! Atomic scan counters.
//!
//! The counters are the only state mutated concurrently from many workers
//! without phase isolation, so they use lock-free atomic increments - a
//! mutex here would serialize the per-file hot path.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// A labeled monotonically increasing counter.
#[derive(Debug)]
pub struct Counter {
    label: &'static str,
    value: AtomicU64,
}

impl Counter {
    /// Create a counter at zero.
    #[must_use]
    pub fn new(label: &'static str) -> Self {
        Self {
            label,
            value: AtomicU64::new(0),
        }
    }

    /// Increment by one.
    pub fn inc(&self) {
        self.add(1);
    }

    /// Increment by `n`.
    pub fn add(&self, n: u64) {
        self.value.fetch_add(n, Ordering::Relaxed);
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.value.load(Ordering::Relaxed)
    }
}

impl fmt::Display for Counter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.label, self.value())
    }
}

/// Counters for one scan run.
///
/// Created at orchestration start, logged at phase boundaries, discarded at
/// run end. All values are monotonic within a run.
#[derive(Debug)]
pub struct ScanMetrics {
    /// Regular files seen by the walkers.
    pub files_seen: Counter,
    /// Bytes across all files seen.
    pub bytes_seen: Counter,
    /// Files queued for content hashing after size bucketing.
    pub files_to_hash: Counter,
    /// Bytes queued for content hashing.
    pub bytes_to_hash: Counter,
    /// Files full-hashed so far.
    pub files_hashed: Counter,
    /// Bytes full-hashed so far.
    pub bytes_hashed: Counter,
}

impl ScanMetrics {
    /// Create a fresh metrics set for a run.
    #[must_use]
    pub fn new() -> Self {
        Self {
            files_seen: Counter::new("files"),
            bytes_seen: Counter::new("file-size"),
            files_to_hash: Counter::new("files-to-hash"),
            bytes_to_hash: Counter::new("files-to-hash-by-bytes"),
            files_hashed: Counter::new("processed-files-to-hash"),
            bytes_hashed: Counter::new("processed-files-to-hash-by-bytes"),
        }
    }

    /// Log a snapshot of every counter.
    pub fn log_snapshot(&self) {
        log::info!("metrics");
        log::info!("  {}", self.files_seen);
        log::info!("  {}", self.bytes_seen);
        log::info!("  {}", self.files_to_hash);
        log::info!("  {}", self.bytes_to_hash);
        log::info!("  {}", self.files_hashed);
        log::info!("  {}", self.bytes_hashed);
    }
}

impl Default for ScanMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counter_increments() {
        let c = Counter::new("files");
        c.inc();
        c.add(4);
        assert_eq!(c.value(), 5);
        assert_eq!(c.to_string(), "files 5");
    }

    #[test]
    fn test_counter_concurrent_adds() {
        let c = Counter::new("bytes");
        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    for _ in 0..1000 {
                        c.add(2);
                    }
                });
            }
        });
        assert_eq!(c.value(), 16_000);
    }

    #[test]
    fn test_metrics_start_at_zero() {
        let m = ScanMetrics::new();
        assert_eq!(m.files_seen.value(), 0);
        assert_eq!(m.bytes_hashed.value(), 0);
    }
}
