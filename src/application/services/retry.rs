use std::time::Duration;

use rand::Rng;

/// Upper bound on the random jitter added to every backoff delay.
pub const MAX_JITTER_MS: u64 = 250;

/// Bounded exponential backoff shared by every summarization route.
#[derive(Debug, Clone)]
pub struct RetryPolicy {
    max_attempts: u32,
    base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_attempts: u32, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    pub fn max_attempts(&self) -> u32 {
        self.max_attempts
    }

    /// Delay before retrying after the given 1-based attempt failed:
    /// `base * 2^(attempt - 1)` plus uniform jitter so concurrent callers
    /// do not retry in lockstep.
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(16);
        let backoff = self.base_delay.saturating_mul(2u32.saturating_pow(exponent));
        let jitter = rand::thread_rng().gen_range(0..=MAX_JITTER_MS);
        backoff + Duration::from_millis(jitter)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new(5, Duration::from_secs(1))
    }
}
