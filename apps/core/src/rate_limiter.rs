use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Requests allowed per client within [`CHAT_RATE_WINDOW`].
pub const CHAT_RATE_LIMIT: usize = 30;
/// Sliding window for the chat endpoint.
pub const CHAT_RATE_WINDOW: Duration = Duration::from_secs(60);

/// Sliding-window rate limiter keyed by client id (user email or peer
/// address for anonymous chat).
pub struct RateLimiter {
    requests: HashMap<String, Vec<Instant>>,
    limit: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(limit: usize, window: Duration) -> Self {
        RateLimiter {
            requests: HashMap::new(),
            limit,
            window,
        }
    }

    /// Records the request and reports whether it is within the limit.
    pub fn check(&mut self, id: &str) -> bool {
        let now = Instant::now();
        let window_start = now - self.window;

        let client_requests = self.requests.entry(id.to_string()).or_default();
        client_requests.retain(|&timestamp| timestamp > window_start);

        if client_requests.len() < self.limit {
            client_requests.push(now);
            true
        } else {
            false
        }
    }

    /// Drops clients whose entire window has expired.
    pub fn prune(&mut self) {
        let now = Instant::now();
        let window = self.window;
        self.requests.retain(|_, timestamps| {
            timestamps.retain(|&ts| now.duration_since(ts) < window);
            !timestamps.is_empty()
        });
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(CHAT_RATE_LIMIT, CHAT_RATE_WINDOW)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;

    #[test]
    fn test_allows_requests_within_limit() {
        let mut limiter = RateLimiter::new(5, Duration::from_secs(1));
        for _ in 0..5 {
            assert!(limiter.check("client1"));
        }
        assert!(!limiter.check("client1"));
        // An unrelated client is unaffected.
        assert!(limiter.check("client2"));
    }

    #[test]
    fn test_window_reset() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(50));
        assert!(limiter.check("client"));
        assert!(limiter.check("client"));
        assert!(!limiter.check("client"));

        thread::sleep(Duration::from_millis(60));

        assert!(limiter.check("client"));
    }

    #[test]
    fn test_prune_drops_idle_clients() {
        let mut limiter = RateLimiter::new(2, Duration::from_millis(20));
        limiter.check("idle");
        thread::sleep(Duration::from_millis(30));
        limiter.prune();
        assert!(limiter.requests.is_empty());
    }
}
