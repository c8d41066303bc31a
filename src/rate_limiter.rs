//! In-memory fixed-window rate limiter guarding the credential-bearing
//! endpoints (login, page-lock password verification).

use std::time::{Duration, Instant};

use dashmap::DashMap;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u32,
}

/// Fixed-window counter keyed by an arbitrary string (client address +
/// endpoint). Windows reset lazily on the next hit after expiry.
#[derive(Debug)]
pub struct RateLimiter {
    max_attempts: u32,
    window: Duration,
    windows: DashMap<String, Window>,
}

impl RateLimiter {
    pub fn new(max_attempts: u32, window: Duration) -> Self {
        Self {
            max_attempts,
            window,
            windows: DashMap::new(),
        }
    }

    /// Records an attempt for `key`; returns false when the key has exhausted
    /// its window.
    pub fn check(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut entry = self.windows.entry(key.to_string()).or_insert(Window {
            started: now,
            count: 0,
        });

        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }

        entry.count += 1;
        entry.count <= self.max_attempts
    }

    /// Drops windows that expired, bounding memory on long-running servers.
    pub fn purge_expired(&self) {
        let now = Instant::now();
        let window = self.window;
        self.windows
            .retain(|_, w| now.duration_since(w.started) < window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = RateLimiter::new(3, Duration::from_secs(60));
        assert!(limiter.check("1.2.3.4:login"));
        assert!(limiter.check("1.2.3.4:login"));
        assert!(limiter.check("1.2.3.4:login"));
        assert!(!limiter.check("1.2.3.4:login"));
    }

    #[test]
    fn keys_are_independent() {
        let limiter = RateLimiter::new(1, Duration::from_secs(60));
        assert!(limiter.check("a"));
        assert!(!limiter.check("a"));
        assert!(limiter.check("b"));
    }

    #[test]
    fn window_resets_after_expiry() {
        let limiter = RateLimiter::new(1, Duration::from_millis(0));
        assert!(limiter.check("a"));
        // Zero-length window: every hit starts a fresh window
        assert!(limiter.check("a"));
    }

    #[test]
    fn purge_removes_expired_windows() {
        let limiter = RateLimiter::new(1, Duration::from_millis(0));
        limiter.check("a");
        limiter.purge_expired();
        assert!(limiter.windows.is_empty());
    }
}
