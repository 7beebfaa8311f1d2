//! Message and byte counters for a node

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

/// Snapshot of a node's traffic
#[derive(Debug, Clone)]
pub struct NodeStats {
    /// Messages published to the room
    pub published: u64,
    /// Samples received from the room, including our own echoes
    pub received: u64,
    /// Received samples dropped because we sent them
    pub discarded_self: u64,
    /// Received samples dropped because they did not decode
    pub discarded_malformed: u64,
    /// Total bytes published
    pub output_bytes: u64,
    /// Total bytes received
    pub input_bytes: u64,
    /// Timestamp when stats collection started
    pub start_time: Instant,
}

impl NodeStats {
    /// Time since stats collection started
    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

impl std::fmt::Display for NodeStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Published: {} ({} bytes), Received: {} ({} bytes), Discarded: {} self / {} malformed, Uptime: {:.1}s",
            self.published,
            self.output_bytes,
            self.received,
            self.input_bytes,
            self.discarded_self,
            self.discarded_malformed,
            self.elapsed().as_secs_f64()
        )
    }
}

/// Thread-safe statistics tracker
///
/// Uses atomic operations for lock-free concurrent updates
#[derive(Debug)]
pub struct StatsTracker {
    published: AtomicU64,
    received: AtomicU64,
    discarded_self: AtomicU64,
    discarded_malformed: AtomicU64,
    output_bytes: AtomicU64,
    input_bytes: AtomicU64,
    start_time: std::sync::Mutex<Instant>,
}

impl StatsTracker {
    /// Create a new StatsTracker
    pub fn new() -> Self {
        Self {
            published: AtomicU64::new(0),
            received: AtomicU64::new(0),
            discarded_self: AtomicU64::new(0),
            discarded_malformed: AtomicU64::new(0),
            output_bytes: AtomicU64::new(0),
            input_bytes: AtomicU64::new(0),
            start_time: std::sync::Mutex::new(Instant::now()),
        }
    }

    /// Count one published message of `bytes` bytes
    pub fn add_published(&self, bytes: usize) {
        self.published.fetch_add(1, Ordering::Relaxed);
        self.output_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Count one received sample of `bytes` bytes
    pub fn add_received(&self, bytes: usize) {
        self.received.fetch_add(1, Ordering::Relaxed);
        self.input_bytes.fetch_add(bytes as u64, Ordering::Relaxed);
    }

    /// Count a dropped self echo
    pub fn add_discarded_self(&self) {
        self.discarded_self.fetch_add(1, Ordering::Relaxed);
    }

    /// Count a dropped malformed sample
    pub fn add_discarded_malformed(&self) {
        self.discarded_malformed.fetch_add(1, Ordering::Relaxed);
    }

    /// Get current statistics snapshot
    pub fn get_stats(&self) -> NodeStats {
        NodeStats {
            published: self.published.load(Ordering::Relaxed),
            received: self.received.load(Ordering::Relaxed),
            discarded_self: self.discarded_self.load(Ordering::Relaxed),
            discarded_malformed: self.discarded_malformed.load(Ordering::Relaxed),
            output_bytes: self.output_bytes.load(Ordering::Relaxed),
            input_bytes: self.input_bytes.load(Ordering::Relaxed),
            start_time: self
                .start_time
                .lock()
                .map(|start| *start)
                .unwrap_or_else(|poisoned| *poisoned.into_inner()),
        }
    }

    /// Reset all counters and restart the timer
    pub fn reset(&self) {
        for counter in [
            &self.published,
            &self.received,
            &self.discarded_self,
            &self.discarded_malformed,
            &self.output_bytes,
            &self.input_bytes,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
        if let Ok(mut start) = self.start_time.lock() {
            *start = Instant::now();
        }
    }
}

impl Default for StatsTracker {
    fn default() -> Self {
        Self::new()
    }
}
