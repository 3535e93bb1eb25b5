use askama::Template;
use chrono::{DateTime, Utc};
use folio_core::{
    CredentialPolicy, Email, EmailClient, RateLimitDecision, RateLimiter, RateLimiterError,
    UserStore, UserStoreError,
};
use secrecy::ExposeSecret;

use crate::emails::{VERIFICATION_EMAIL_SUBJECT, VerificationEmail};

/// Error types for resend code use case
#[derive(Debug, thiserror::Error)]
pub enum ResendCodeError {
    #[error("Too many attempts. Please try again in {retry_after_seconds} seconds.")]
    RateLimited { retry_after_seconds: u64 },
    #[error("Rate limiter error: {0}")]
    RateLimiterError(#[from] RateLimiterError),
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
}

/// Resend code use case - generates a fresh verification code (invalidating
/// any previous one) and emails it.
///
/// Unknown or already-verified accounts return Ok without sending anything,
/// so the response never confirms account existence.
pub struct ResendCodeUseCase<'a, U, E, R>
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

impl<'a, U, E, R> ResendCodeUseCase<'a, U, E, R>
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

    #[tracing::instrument(name = "ResendCodeUseCase::execute", skip(self, now))]
    pub async fn execute(&self, email: Email, now: DateTime<Utc>) -> Result<(), ResendCodeError> {
        // Rate limit before the lookup so probing counts as an attempt too.
        if let RateLimitDecision::Limited {
            retry_after_seconds,
        } = self
            .rate_limiter
            .check(email.as_ref().expose_secret())
            .await?
        {
            return Err(ResendCodeError::RateLimited {
                retry_after_seconds,
            });
        }

        let mut user = match self.user_store.get_user(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Ok(()),
            Err(e) => return Err(e.into()),
        };

        if user.is_email_verified() {
            return Ok(());
        }

        let code = user.begin_email_verification(now, self.policy.verification_code_ttl);
        self.user_store.save_credential_state(&user).await?;

        let body = VerificationEmail {
            code: code.as_str(),
            expires_in_minutes: self.policy.verification_code_ttl.num_minutes(),
        }
        .render()
        .map_err(|e| ResendCodeError::EmailError(e.to_string()))?;

        self.email_client
            .send_email(user.email(), VERIFICATION_EMAIL_SUBJECT, &body)
            .await
            .map_err(ResendCodeError::EmailError)?;

        Ok(())
    }
}
