//! Fixed-window registration rate limiting keyed by source address.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tracing::warn;

use passport_core::error::{PassportError, PassportResult};
use passport_core::support::RegistrationLimiter;

/// Admits at most `max_per_window` registrations per source address per
/// window. The window resets wholesale when it elapses.
pub struct MemoryRegistrationLimiter {
    max_per_window: u32,
    window: Duration,
    hits: Arc<Mutex<HashMap<String, (u32, Instant)>>>,
}

impl MemoryRegistrationLimiter {
    pub fn new(max_per_window: u32, window: Duration) -> Self {
        Self {
            max_per_window,
            window,
            hits: Arc::new(Mutex::new(HashMap::new())),
        }
    }
}

impl RegistrationLimiter for MemoryRegistrationLimiter {
    async fn check(&self, source_ip: &str) -> PassportResult<()> {
        let mut hits = self.hits.lock().await;
        let now = Instant::now();
        let entry = hits.entry(source_ip.to_string()).or_insert((0, now));

        if now.duration_since(entry.1) >= self.window {
            *entry = (0, now);
        }

        entry.0 += 1;
        if entry.0 > self.max_per_window {
            warn!(source_ip, count = entry.0, "registration rate limit exceeded");
            return Err(PassportError::RateLimited);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn admits_up_to_the_limit() {
        let limiter = MemoryRegistrationLimiter::new(2, Duration::from_secs(3600));
        limiter.check("10.0.0.1").await.unwrap();
        limiter.check("10.0.0.1").await.unwrap();
        let err = limiter.check("10.0.0.1").await.unwrap_err();
        assert!(matches!(err, PassportError::RateLimited));
    }

    #[tokio::test]
    async fn sources_are_independent() {
        let limiter = MemoryRegistrationLimiter::new(1, Duration::from_secs(3600));
        limiter.check("10.0.0.1").await.unwrap();
        limiter.check("10.0.0.2").await.unwrap();
    }

    #[tokio::test]
    async fn window_reset_admits_again() {
        let limiter = MemoryRegistrationLimiter::new(1, Duration::from_millis(0));
        limiter.check("10.0.0.1").await.unwrap();
        // Zero-length window: every call starts a fresh one.
        limiter.check("10.0.0.1").await.unwrap();
    }
}
