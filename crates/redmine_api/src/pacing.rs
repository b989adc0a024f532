//! Minimum-interval pacing between outbound Redmine requests.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::time::sleep;

/// Enforces a minimum delay between consecutive API calls so that a run's
/// entry fetch plus N issue lookups stay polite toward the server.
#[derive(Clone, Debug)]
pub struct RequestPacer {
    interval: Duration,
    last_request: Arc<Mutex<Option<Instant>>>,
}

impl RequestPacer {
    /// Creates a pacer that keeps at least `interval` between requests.
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    /// Waits until the interval since the previous request has elapsed,
    /// then records the current request timestamp.
    pub async fn pause(&self) {
        let mut guard = self.last_request.lock().await;
        if let Some(last) = *guard {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                sleep(self.interval - elapsed).await;
            }
        }
        *guard = Some(Instant::now());
    }

    /// Returns the configured minimum interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }
}
