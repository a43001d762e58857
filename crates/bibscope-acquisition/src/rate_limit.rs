//! Per-adapter rate limiting: a token bucket keyed by adapter id, generalized
//! from the teacher's per-domain `DomainRateLimiter` (spec §4.2, §5).

use std::collections::HashMap;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

struct TokenBucket {
    tokens: f64,
    last_refill: Instant,
    rate: f64,
}

impl TokenBucket {
    fn new(rate: f64) -> Self {
        Self {
            tokens: rate.max(1.0),
            last_refill: Instant::now(),
            rate,
        }
    }

    fn refill(&mut self) {
        let elapsed = self.last_refill.elapsed().as_secs_f64();
        self.tokens = (self.tokens + elapsed * self.rate).min(self.rate.max(1.0) * 2.0);
        self.last_refill = Instant::now();
    }

    fn try_acquire(&mut self) -> bool {
        self.refill();
        if self.tokens >= 1.0 {
            self.tokens -= 1.0;
            true
        } else {
            false
        }
    }

    fn time_until_available(&mut self) -> Duration {
        self.refill();
        if self.tokens >= 1.0 {
            Duration::ZERO
        } else {
            let needed = 1.0 - self.tokens;
            Duration::from_secs_f64(needed / self.rate.max(f64::MIN_POSITIVE))
        }
    }
}

/// Source-adapter rate limiter. Each adapter honors its own minimum
/// seconds-between-calls; a given adapter id starts with a full bucket so
/// its first call never waits.
pub struct AdapterRateLimiter {
    buckets: Mutex<HashMap<String, TokenBucket>>,
}

impl AdapterRateLimiter {
    pub fn new() -> Self {
        Self {
            buckets: Mutex::new(HashMap::new()),
        }
    }

    /// Block until a permit for `adapter_id` is available, honoring
    /// `min_interval_s` seconds between calls (rate = 1 / min_interval_s).
    pub async fn acquire(&self, adapter_id: &str, min_interval_s: f64) {
        let rate = if min_interval_s > 0.0 { 1.0 / min_interval_s } else { f64::MAX };

        loop {
            let wait = {
                let mut buckets = self.buckets.lock().await;
                let bucket = buckets
                    .entry(adapter_id.to_string())
                    .or_insert_with(|| TokenBucket::new(rate));

                if bucket.try_acquire() {
                    return;
                }
                bucket.time_until_available()
            };

            if wait.is_zero() {
                return;
            }
            tokio::time::sleep(wait).await;
        }
    }
}

impl Default for AdapterRateLimiter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn first_call_never_waits() {
        let limiter = AdapterRateLimiter::new();
        let start = Instant::now();
        limiter.acquire("acm", 5.0).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn zero_rate_limit_never_blocks() {
        let limiter = AdapterRateLimiter::new();
        let start = Instant::now();
        for _ in 0..5 {
            limiter.acquire("acm", 0.0).await;
        }
        assert!(start.elapsed() < Duration::from_millis(50));
    }

    #[tokio::test]
    async fn buckets_are_independent_per_adapter() {
        let limiter = AdapterRateLimiter::new();
        limiter.acquire("acm", 1000.0).await;
        let start = Instant::now();
        limiter.acquire("sage", 1000.0).await;
        assert!(start.elapsed() < Duration::from_millis(50));
    }
}
