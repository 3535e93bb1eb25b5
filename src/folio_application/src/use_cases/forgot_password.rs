use askama::Template;
use chrono::{DateTime, Utc};
use folio_core::{
    CredentialPolicy, Email, EmailClient, RateLimitDecision, RateLimiter, RateLimiterError,
    UserStore, UserStoreError,
};
use secrecy::ExposeSecret;

use crate::emails::{PASSWORD_RESET_EMAIL_SUBJECT, PasswordResetEmail};

/// Error types for forgot password use case
#[derive(Debug, thiserror::Error)]
pub enum ForgotPasswordError {
    #[error("Too many attempts. Please try again in {retry_after_seconds} seconds.")]
    RateLimited { retry_after_seconds: u64 },
    #[error("Rate limiter error: {0}")]
    RateLimiterError(#[from] RateLimiterError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
}

/// Forgot password use case - generates a single-use reset token
/// (invalidating any previous one) and emails it.
///
/// Unknown accounts return Ok without sending anything; the handler responds
/// with the same generic message either way.
pub struct ForgotPasswordUseCase<'a, U, E, R>
where
    U: UserStore,
    E: EmailClient,
    R: RateLimiter,
{
    user_store: &'a U,
    email_client: &'a E,
    rate_limiter: &'a R,
    policy: CredentialPolicy,
}

impl<'a, U, E, R> ForgotPasswordUseCase<'a, U, E, R>
where
    U: UserStore,
    E: EmailClient,
    R: RateLimiter,
{
    pub fn new(
        user_store: &'a U,
        email_client: &'a E,
        rate_limiter: &'a R,
        policy: CredentialPolicy,
    ) -> Self {
        Self {
            user_store,
            email_client,
            rate_limiter,
            policy,
        }
    }

    #[tracing::instrument(name = "ForgotPasswordUseCase::execute", skip(self, now))]
    pub async fn execute(
        &self,
        email: Email,
        now: DateTime<Utc>,
    ) -> Result<(), ForgotPasswordError> {
        if let RateLimitDecision::Limited {
            retry_after_seconds,
        } = self
            .rate_limiter
            .check(email.as_ref().expose_secret())
            .await?
        {
            return Err(ForgotPasswordError::RateLimited {
                retry_after_seconds,
            });
        }

        let mut user = match self.user_store.get_user(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        let token = user.begin_password_reset(now, self.policy.reset_token_ttl);
        self.user_store.save_credential_state(&user).await?;

        let body = PasswordResetEmail {
            token: token.as_str(),
            expires_in_minutes: self.policy.reset_token_ttl.num_minutes(),
        }
        .render()
        .map_err(|e| ForgotPasswordError::EmailError(e.to_string()))?;

        self.email_client
            .send_email(user.email(), PASSWORD_RESET_EMAIL_SUBJECT, &body)
            .await
            .map_err(ForgotPasswordError::EmailError)?;

        Ok(())
    }
}
