//! Outbound Rate Limiter
//!
//! Token bucket capping calls to the remote analysis service. Permits are
//! consumed on acquire and returned only by a periodic refill task — one
//! permit per `window / capacity` — so a slow remote call cannot starve the
//! bucket and a burst cannot exceed the configured window budget.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Semaphore;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::RateLimitConfig;

/// Process-wide permit pool for remote calls.
pub struct RemoteRateLimiter {
    permits: Arc<Semaphore>,
    capacity: usize,
    refill_task: JoinHandle<()>,
}

impl RemoteRateLimiter {
    /// Build from configuration. Must run inside a Tokio runtime: the refill
    /// task is spawned here and aborted when the limiter is dropped.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(config.capacity, config.refill_interval())
    }

    pub fn new(capacity: usize, refill_interval: Duration) -> Self {
        let capacity = capacity.max(1);
        let permits = Arc::new(Semaphore::new(capacity));
        let refill_task = tokio::spawn(Self::refill_loop(
            Arc::clone(&permits),
            capacity,
            refill_interval.max(Duration::from_millis(1)),
        ));

        Self {
            permits,
            capacity,
            refill_task,
        }
    }

    async fn refill_loop(permits: Arc<Semaphore>, capacity: usize, interval: Duration) {
        // First tick lands one full period after start, not immediately
        let start = tokio::time::Instant::now() + interval;
        let mut ticker = tokio::time::interval_at(start, interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            // Clamped at capacity: refill never grows the pool past its bound
            if permits.available_permits() < capacity {
                permits.add_permits(1);
            }
        }
    }

    /// Consume one permit, suspending until one is available.
    ///
    /// Cancellation-safe: dropping the future abandons the wait without
    /// consuming anything.
    pub async fn acquire(&self) {
        match self.permits.acquire().await {
            Ok(permit) => permit.forget(),
            // The semaphore is never closed while the limiter exists.
            Err(_) => {}
        }
    }

    pub fn available_permits(&self) -> usize {
        self.permits.available_permits()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }
}

impl Drop for RemoteRateLimiter {
    fn drop(&mut self) {
        self.refill_task.abort();
    }
}
