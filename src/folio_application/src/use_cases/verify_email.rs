use chrono::{DateTime, Utc};
use folio_core::{CredentialError, Email, User, UserStore, UserStoreError, VerificationCode};

/// Error types for verify email use case
#[derive(Debug, thiserror::Error)]
pub enum VerifyEmailError {
    /// Covers unknown account, wrong code, consumed code, and expired code,
    /// so the response never confirms whether the account exists.
    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,
    #[error("Email is already verified")]
    AlreadyVerified,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Verify email use case - checks a presented code against the pending state
/// and flips `is_email_verified` exactly once.
pub struct VerifyEmailUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> VerifyEmailUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    /// Execute the verify email use case
    ///
    /// Expired secrets found along the way are cleared and the cleanup is
    /// persisted (lazy cleanup on read).
    #[tracing::instrument(name = "VerifyEmailUseCase::execute", skip(self, code, now))]
    pub async fn execute(
        &self,
        email: Email,
        code: VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<User, VerifyEmailError> {
        let mut user = match self.user_store.get_user(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Err(VerifyEmailError::InvalidOrExpiredCode),
            Err(e) => return Err(VerifyEmailError::UserStoreError(e)),
        };

        let cleaned = user.cleanup_expired(now);

        match user.confirm_email(&code, now) {
            Ok(()) => {
                self.user_store
                    .save_credential_state(&user)
                    .await
                    .map_err(VerifyEmailError::UserStoreError)?;
                Ok(user)
            }
            Err(CredentialError::AlreadyVerified) => Err(VerifyEmailError::AlreadyVerified),
            Err(err) => {
                if cleaned || err == CredentialError::Expired {
                    self.user_store
                        .save_credential_state(&user)
                        .await
                        .map_err(VerifyEmailError::UserStoreError)?;
                }
                Err(VerifyEmailError::InvalidOrExpiredCode)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use folio_core::{CredentialPolicy, Username};
    use secrecy::Secret;

    use super::*;
    use crate::use_cases::test_support::{MockUserStore, email};

    async fn user_with_code(
        store: &MockUserStore,
        addr: &str,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> VerificationCode {
        let mut user = User::new(
            Email::try_from(Secret::from(addr.to_string())).unwrap(),
            Username::parse("darsh".to_string()).unwrap(),
        );
        let code = user.begin_email_verification(issued_at, ttl);
        store.insert(user, "password123").await;
        code
    }

    #[tokio::test]
    async fn correct_code_within_window_verifies_and_clears() {
        let store = MockUserStore::new();
        let now = Utc::now();
        let ttl = CredentialPolicy::default().verification_code_ttl;
        let code = user_with_code(&store, "a@x.com", now, ttl).await;

        let use_case = VerifyEmailUseCase::new(&store);
        let user = use_case.execute(email("a@x.com"), code, now).await.unwrap();

        assert!(user.is_email_verified());
        assert!(user.pending_verification().is_none());

        let stored = store.stored(&email("a@x.com")).await.unwrap();
        assert!(stored.is_email_verified());
        assert!(stored.pending_verification().is_none());
    }

    #[tokio::test]
    async fn replaying_a_consumed_code_fails() {
        let store = MockUserStore::new();
        let now = Utc::now();
        let ttl = CredentialPolicy::default().verification_code_ttl;
        let code = user_with_code(&store, "a@x.com", now, ttl).await;

        let use_case = VerifyEmailUseCase::new(&store);
        use_case
            .execute(email("a@x.com"), code.clone(), now)
            .await
            .unwrap();

        let result = use_case.execute(email("a@x.com"), code, now).await;
        assert!(matches!(result, Err(VerifyEmailError::AlreadyVerified)));
    }

    #[tokio::test]
    async fn expired_code_is_rejected_and_cleared_in_store() {
        let store = MockUserStore::new();
        let issued_at = Utc::now();
        let code = user_with_code(&store, "a@x.com", issued_at, Duration::minutes(10)).await;

        let later = issued_at + Duration::minutes(11);
        let use_case = VerifyEmailUseCase::new(&store);
        let result = use_case.execute(email("a@x.com"), code, later).await;

        assert!(matches!(result, Err(VerifyEmailError::InvalidOrExpiredCode)));

        // Lazy cleanup persisted: the stored record no longer holds a code.
        let stored = store.stored(&email("a@x.com")).await.unwrap();
        assert!(stored.pending_verification().is_none());
        assert!(!stored.is_email_verified());
    }

    #[tokio::test]
    async fn wrong_code_is_rejected_without_clearing() {
        let store = MockUserStore::new();
        let now = Utc::now();
        let code = user_with_code(&store, "a@x.com", now, Duration::minutes(10)).await;

        let wrong = VerificationCode::parse(
            if code.as_str() == "123456" { "654321" } else { "123456" }.to_string(),
        )
        .unwrap();

        let use_case = VerifyEmailUseCase::new(&store);
        let result = use_case.execute(email("a@x.com"), wrong, now).await;
        assert!(matches!(result, Err(VerifyEmailError::InvalidOrExpiredCode)));

        let stored = store.stored(&email("a@x.com")).await.unwrap();
        assert!(stored.pending_verification().is_some());
    }

    #[tokio::test]
    async fn unknown_account_reads_as_invalid_code() {
        let store = MockUserStore::new();
        let use_case = VerifyEmailUseCase::new(&store);

        let result = use_case
            .execute(
                email("ghost@x.com"),
                VerificationCode::parse("123456".to_string()).unwrap(),
                Utc::now(),
            )
            .await;

        assert!(matches!(result, Err(VerifyEmailError::InvalidOrExpiredCode)));
    }
}
