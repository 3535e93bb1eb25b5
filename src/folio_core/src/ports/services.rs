use async_trait::async_trait;
use thiserror::Error;

use crate::domain::email::Email;

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}

/// Outcome of a rate-limit check. The check itself counts as an attempt when
/// allowed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed { attempts_left: u32 },
    Limited { retry_after_seconds: u64 },
}

#[derive(Debug, Error)]
pub enum RateLimiterError {
    #[error("Rate limiter backend error: {0}")]
    UnexpectedError(String),
}

/// Port trait for bounding how often an identifier (an email address) may
/// trigger secret generation within a rolling window.
///
/// Backing stores range from a process-local map (resets on restart, no
/// cross-instance protection - an abuse-slowing heuristic, not a security
/// boundary) to a shared cache for multi-instance deployments.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    async fn check(&self, identifier: &str) -> Result<RateLimitDecision, RateLimiterError>;
}
