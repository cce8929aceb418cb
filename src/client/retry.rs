//! Rate-limit retry policy
//!
//! One policy object applies uniformly to every paginated and
//! single-resource fetch: a bounded number of extra attempts with
//! exponentially doubling delay plus a small jitter so parallel clients
//! de-synchronize.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// Retry policy for rate-limited page requests.
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Extra attempts after the initial request.
    pub max_retries: u32,
    /// Delay before the first retry; doubles on each subsequent one.
    pub base_delay: Duration,
    /// Upper bound for the random jitter added to each delay.
    pub jitter: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: 2,
            base_delay: Duration::from_millis(500),
            jitter: Duration::from_millis(250),
        }
    }
}

impl RetryPolicy {
    /// Deterministic backoff component for a retry attempt (0-based).
    pub fn backoff(&self, attempt: u32) -> Duration {
        // 2^attempt, saturating well below any overflow
        self.base_delay * 2u32.saturating_pow(attempt.min(16))
    }

    /// Full delay before the given retry attempt: backoff plus jitter.
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        self.backoff(attempt) + self.jitter_sample()
    }

    /// Whether another retry is allowed after `attempt` retries already ran.
    pub fn allows_retry(&self, attempt: u32) -> bool {
        attempt < self.max_retries
    }

    // Sub-second wall-clock nanoseconds as a jitter source: cheap and plenty
    // to spread a fleet of clients, which is all the jitter is for.
    fn jitter_sample(&self) -> Duration {
        let jitter_ms = self.jitter.as_millis() as u64;
        if jitter_ms == 0 {
            return Duration::ZERO;
        }
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| u64::from(d.subsec_nanos()))
            .unwrap_or(0);
        Duration::from_millis(nanos % jitter_ms)
    }
}
