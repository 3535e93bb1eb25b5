use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use dashmap::DashMap;
use folio_core::{RateLimitDecision, RateLimiter, RateLimiterError};

struct Window {
    started_at: DateTime<Utc>,
    attempts: u32,
}

/// Process-local rate limiter keyed by identifier.
///
/// The window starts at the first attempt and resets once it has fully
/// elapsed. State lives in this process only: restarts clear it and separate
/// instances do not share counts. Clones share the same map.
#[derive(Clone)]
pub struct InMemoryRateLimiter {
    windows: Arc<DashMap<String, Window>>,
    window: Duration,
    max_attempts: u32,
}

impl InMemoryRateLimiter {
    pub fn new(window: Duration, max_attempts: u32) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            window,
            max_attempts,
        }
    }

    // The entry guard holds the shard lock, so read-modify-write on a single
    // identifier is atomic.
    fn check_at(&self, identifier: &str, now: DateTime<Utc>) -> RateLimitDecision {
        let mut entry = self
            .windows
            .entry(identifier.to_string())
            .or_insert_with(|| Window {
                started_at: now,
                attempts: 0,
            });

        if now - entry.started_at >= self.window {
            entry.started_at = now;
            entry.attempts = 0;
        }

        if entry.attempts >= self.max_attempts {
            let remaining_ms = (entry.started_at + self.window - now)
                .num_milliseconds()
                .max(0);
            return RateLimitDecision::Limited {
                retry_after_seconds: ((remaining_ms + 999) / 1000) as u64,
            };
        }

        entry.attempts += 1;
        RateLimitDecision::Allowed {
            attempts_left: self.max_attempts - entry.attempts,
        }
    }
}

#[async_trait::async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn check(&self, identifier: &str) -> Result<RateLimitDecision, RateLimiterError> {
        Ok(self.check_at(identifier, Utc::now()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn limiter() -> InMemoryRateLimiter {
        InMemoryRateLimiter::new(Duration::minutes(15), 5)
    }

    #[test]
    fn allows_up_to_the_limit_then_blocks() {
        let limiter = limiter();
        let now = Utc::now();

        for expected_left in (0..5).rev() {
            assert_eq!(
                limiter.check_at("a@x.com", now),
                RateLimitDecision::Allowed {
                    attempts_left: expected_left
                }
            );
        }

        assert!(matches!(
            limiter.check_at("a@x.com", now),
            RateLimitDecision::Limited { .. }
        ));
    }

    #[test]
    fn retry_after_counts_down_and_rounds_up() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..5 {
            limiter.check_at("a@x.com", now);
        }

        let decision = limiter.check_at("a@x.com", now + Duration::minutes(5));
        assert_eq!(
            decision,
            RateLimitDecision::Limited {
                retry_after_seconds: 600
            }
        );

        // 899.5s left rounds up to a full 900.
        let decision = limiter.check_at("a@x.com", now + Duration::milliseconds(500));
        assert_eq!(
            decision,
            RateLimitDecision::Limited {
                retry_after_seconds: 900
            }
        );
    }

    #[test]
    fn window_resets_after_it_elapses() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..5 {
            limiter.check_at("a@x.com", now);
        }
        assert!(matches!(
            limiter.check_at("a@x.com", now),
            RateLimitDecision::Limited { .. }
        ));

        let later = now + Duration::minutes(15);
        assert_eq!(
            limiter.check_at("a@x.com", later),
            RateLimitDecision::Allowed { attempts_left: 4 }
        );
    }

    #[test]
    fn identifiers_are_tracked_independently() {
        let limiter = limiter();
        let now = Utc::now();

        for _ in 0..5 {
            limiter.check_at("a@x.com", now);
        }
        assert!(matches!(
            limiter.check_at("a@x.com", now),
            RateLimitDecision::Limited { .. }
        ));
        assert_eq!(
            limiter.check_at("b@x.com", now),
            RateLimitDecision::Allowed { attempts_left: 4 }
        );
    }
}
