use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Controllable time for reopen-buffer expiry.
///
/// Passed to the coordinator via `with_time_provider()`.
#[derive(Clone)]
pub struct MockClock {
    current: Arc<AtomicI64>,
}

impl MockClock {
    /// Creates a time provider function suitable for the coordinator.
    pub fn as_provider(&self) -> impl Fn() -> i64 + Send + Sync + 'static {
        let current = self.current.clone();
        move || current.load(Ordering::SeqCst)
    }

    /// A clock starting at a fixed instant.
    pub fn new() -> Self {
        Self {
            current: Arc::new(AtomicI64::new(1_700_000_000)),
        }
    }

    pub fn now(&self) -> i64 {
        self.current.load(Ordering::SeqCst)
    }

    pub fn advance(&self, duration: Duration) {
        self.current
            .fetch_add(duration.as_secs() as i64, Ordering::SeqCst);
    }
}

impl Default for MockClock {
    fn default() -> Self {
        Self::new()
    }
}
