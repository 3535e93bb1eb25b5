use std::sync::Arc;

use folio_core::{RateLimitDecision, RateLimiter, RateLimiterError};
use redis::{Commands, Connection};
use tokio::sync::RwLock;

/// Rate limiter backed by a shared Redis instance, for deployments with more
/// than one service instance.
///
/// Each identifier gets a counter with the window as its TTL; Redis expiry
/// handles the reset. INCR and EXPIRE are two commands, so a crash between
/// them can leave a counter without a TTL; the `count == 1` guard re-arms it
/// on the next attempt.
#[derive(Clone)]
pub struct RedisRateLimiter {
    conn: Arc<RwLock<Connection>>,
    window_seconds: u64,
    max_attempts: u32,
}

impl RedisRateLimiter {
    pub fn new(conn: Arc<RwLock<Connection>>, window_seconds: u64, max_attempts: u32) -> Self {
        Self {
            conn,
            window_seconds,
            max_attempts,
        }
    }
}

#[async_trait::async_trait]
impl RateLimiter for RedisRateLimiter {
    #[tracing::instrument(name = "Checking rate limit in Redis", skip_all)]
    async fn check(&self, identifier: &str) -> Result<RateLimitDecision, RateLimiterError> {
        let key = get_key(identifier);
        let mut conn = self.conn.write().await;

        let count: u64 = conn
            .incr(&key, 1)
            .map_err(|e| RateLimiterError::UnexpectedError(e.to_string()))?;

        if count == 1 {
            let _: () = conn
                .expire(&key, self.window_seconds as i64)
                .map_err(|e| RateLimiterError::UnexpectedError(e.to_string()))?;
        }

        if count > self.max_attempts as u64 {
            let ttl: i64 = conn
                .ttl(&key)
                .map_err(|e| RateLimiterError::UnexpectedError(e.to_string()))?;

            // A key without a TTL (-1) gets the full window as the wait.
            let retry_after_seconds = if ttl > 0 {
                ttl as u64
            } else {
                self.window_seconds
            };

            return Ok(RateLimitDecision::Limited {
                retry_after_seconds,
            });
        }

        Ok(RateLimitDecision::Allowed {
            attempts_left: self.max_attempts - count as u32,
        })
    }
}

const RATE_LIMIT_KEY_PREFIX: &str = "rate_limit:";

fn get_key(identifier: &str) -> String {
    format!("{}{}", RATE_LIMIT_KEY_PREFIX, identifier)
}
