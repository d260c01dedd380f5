//! Sliding-window rate limiter for AniList requests.
//!
//! AniList enforces a per-minute request budget; the limiter delays a request
//! until the oldest request in the window has aged out.

use std::collections::VecDeque;
use std::time::{Duration, Instant};
use tokio::time::sleep;

const WINDOW: Duration = Duration::from_secs(60);

/// Rate limiter with a per-minute budget
#[derive(Debug)]
pub struct RateLimiter {
    /// Maximum requests per minute
    max_per_minute: usize,
    /// Request timestamps in the last minute, oldest first
    recent_requests: VecDeque<Instant>,
}

impl RateLimiter {
    /// Create a new rate limiter; a budget of zero is treated as one
    pub fn new(max_per_minute: u32) -> Self {
        let max_per_minute = usize::try_from(max_per_minute.max(1)).unwrap_or(usize::MAX);
        Self {
            max_per_minute,
            recent_requests: VecDeque::with_capacity(max_per_minute.min(1024)),
        }
    }

    /// Wait until a request can be made
    pub async fn acquire(&mut self) {
        self.prune(Instant::now());

        if self.recent_requests.len() >= self.max_per_minute {
            if let Some(&oldest) = self.recent_requests.front() {
                let elapsed = Instant::now().duration_since(oldest);
                if elapsed < WINDOW {
                    let wait_time = WINDOW - elapsed;
                    tracing::debug!(
                        wait_ms = wait_time.as_millis(),
                        "Rate limit: waiting for per-minute limit"
                    );
                    sleep(wait_time).await;
                }
            }
            self.prune(Instant::now());
        }

        self.recent_requests.push_back(Instant::now());
    }

    /// Get the current number of requests in the last minute
    pub fn current_minute_count(&mut self) -> usize {
        self.prune(Instant::now());
        self.recent_requests.len()
    }

    fn prune(&mut self, now: Instant) {
        while let Some(&oldest) = self.recent_requests.front() {
            if now.duration_since(oldest) < WINDOW {
                break;
            }
            self.recent_requests.pop_front();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_under_budget_does_not_wait() {
        let mut limiter = RateLimiter::new(90);

        let start = Instant::now();
        for _ in 0..10 {
            limiter.acquire().await;
        }

        assert!(start.elapsed() < Duration::from_secs(1));
        assert_eq!(limiter.current_minute_count(), 10);
    }

    #[test]
    fn test_current_minute_count() {
        let mut limiter = RateLimiter::new(90);
        assert_eq!(limiter.current_minute_count(), 0);
    }

    #[test]
    fn test_old_requests_are_pruned() {
        let mut limiter = RateLimiter::new(2);
        let now = Instant::now();
        if let Some(old) = now.checked_sub(Duration::from_secs(61)) {
            limiter.recent_requests.push_back(old);
            limiter.recent_requests.push_back(now);
            limiter.prune(now);
            assert_eq!(limiter.recent_requests.len(), 1);
        }
    }
}
