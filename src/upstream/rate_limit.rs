use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::Instant;
#[cfg(feature = "dev")]
use tracing::debug;

// Fixed one-second window counter
#[derive(Debug)]
struct RateLimiterState {
    last_reset: Instant,
    request_count: usize,
}

/// Process-wide requests-per-second limiter for outbound calls.
#[derive(Debug)]
pub struct RateLimiter {
    rate_limit: usize,
    state: Mutex<RateLimiterState>,
}

impl RateLimiter {
    /// `rate_limit == 0` disables limiting.
    pub fn new(rate_limit: usize) -> Self {
        Self {
            rate_limit,
            state: Mutex::new(RateLimiterState {
                last_reset: Instant::now(),
                request_count: 0,
            }),
        }
    }

    /// Waits until a request slot is free in the current window.
    pub async fn acquire(&self) {
        if self.rate_limit == 0 {
            return;
        }

        loop {
            let wait = {
                let mut state = self.state.lock().await;
                let now = Instant::now();
                if now.duration_since(state.last_reset) >= Duration::from_secs(1) {
                    state.last_reset = now;
                    state.request_count = 0;
                }

                if state.request_count < self.rate_limit {
                    state.request_count += 1;
                    return;
                }

                Duration::from_secs(1).saturating_sub(now.duration_since(state.last_reset))
            };

            #[cfg(feature = "dev")]
            debug!("upstream_rate_limited::waiting_ms::{}", wait.as_millis());
            tokio::time::sleep(wait).await;
        }
    }
}
