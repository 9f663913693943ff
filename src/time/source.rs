use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Instant;

/// Abstraction over raw monotonic time.
/// Implementations: SystemTimeSource (production), MockTimeSource (testing).
pub trait TimeSource {
    /// Current time in milliseconds from an arbitrary epoch.
    fn raw_time_ms(&self) -> u64;
}

/// System time source using std::time::Instant.
pub struct SystemTimeSource {
    start: Instant,
}

impl SystemTimeSource {
    pub fn new() -> Self {
        Self {
            start: Instant::now(),
        }
    }
}

impl Default for SystemTimeSource {
    fn default() -> Self {
        Self::new()
    }
}

impl TimeSource for SystemTimeSource {
    fn raw_time_ms(&self) -> u64 {
        self.start.elapsed().as_millis() as u64
    }
}

/// Mock time source for deterministic testing. Clones share the same
/// underlying clock, so a test can keep a handle while the clock under
/// test owns another.
#[derive(Clone, Default)]
pub struct MockTimeSource {
    now_ms: Arc<AtomicU64>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_ms(&self, ms: u64) {
        self.now_ms.store(ms, Ordering::Relaxed);
    }

    pub fn advance_ms(&self, delta_ms: u64) {
        self.now_ms.fetch_add(delta_ms, Ordering::Relaxed);
    }
}

impl TimeSource for MockTimeSource {
    fn raw_time_ms(&self) -> u64 {
        self.now_ms.load(Ordering::Relaxed)
    }
}
