use askama::Template;
use chrono::{DateTime, Utc};
use folio_core::{
    CredentialPolicy, Email, EmailClient, Password, User, UserStore, UserStoreError,
};

use crate::emails::{VERIFICATION_EMAIL_SUBJECT, VerificationEmail};

/// Response from login use case
#[derive(Debug)]
pub enum LoginOutcome {
    /// Credentials valid and email verified; session issuance is the
    /// caller's job.
    Authenticated(User),
    /// Credentials valid but email unverified; a fresh verification code has
    /// already been generated and emailed.
    EmailNotVerified,
}

/// Error types specific to login use case
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    /// Unknown account and wrong password collapse into one message.
    #[error("Invalid email or password")]
    InvalidCredentials,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
}

/// Login use case - checks credentials and gates session issuance on email
/// verification.
pub struct LoginUseCase<'a, U, E>
where
    U: UserStore,
    E: EmailClient,
{
    user_store: &'a U,
    email_client: &'a E,
    policy: CredentialPolicy,
}

impl<'a, U, E> LoginUseCase<'a, U, E>
where
    U: UserStore,
    E: EmailClient,
{
    pub fn new(user_store: &'a U, email_client: &'a E, policy: CredentialPolicy) -> Self {
        Self {
            user_store,
            email_client,
            policy,
        }
    }

    #[tracing::instrument(name = "LoginUseCase::execute", skip(self, password, now))]
    pub async fn execute(
        &self,
        email: Email,
        password: Password,
        now: DateTime<Utc>,
    ) -> Result<LoginOutcome, LoginError> {
        let mut user = match self.user_store.authenticate_user(&email, &password).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound | UserStoreError::IncorrectPassword) => {
                return Err(LoginError::InvalidCredentials);
            }
            Err(e) => return Err(LoginError::UserStoreError(e)),
        };

        if !user.is_email_verified() {
            let code = user.begin_email_verification(now, self.policy.verification_code_ttl);
            self.user_store
                .save_credential_state(&user)
                .await
                .map_err(LoginError::UserStoreError)?;

            let body = VerificationEmail {
                code: code.as_str(),
                expires_in_minutes: self.policy.verification_code_ttl.num_minutes(),
            }
            .render()
            .map_err(|e| LoginError::EmailError(e.to_string()))?;

            self.email_client
                .send_email(user.email(), VERIFICATION_EMAIL_SUBJECT, &body)
                .await
                .map_err(LoginError::EmailError)?;

            return Ok(LoginOutcome::EmailNotVerified);
        }

        Ok(LoginOutcome::Authenticated(user))
    }
}

#[cfg(test)]
mod tests {
    use folio_core::{User, Username};
    use secrecy::Secret;

    use super::*;
    use crate::use_cases::test_support::{MockEmailClient, MockUserStore, email, password};

    async fn seed_user(store: &MockUserStore, addr: &str, verified: bool) {
        let mut user = User::new(
            Email::try_from(Secret::from(addr.to_string())).unwrap(),
            Username::parse("darsh".to_string()).unwrap(),
        );
        if verified {
            let now = Utc::now();
            let code = user.begin_email_verification(now, chrono::Duration::minutes(10));
            user.confirm_email(&code, now).unwrap();
        }
        store.insert(user, "password123").await;
    }

    #[tokio::test]
    async fn verified_user_with_correct_password_authenticates() {
        let store = MockUserStore::new();
        let email_client = MockEmailClient::new();
        seed_user(&store, "a@x.com", true).await;

        let use_case = LoginUseCase::new(&store, &email_client, CredentialPolicy::default());
        let outcome = use_case
            .execute(email("a@x.com"), password("password123"), Utc::now())
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::Authenticated(_)));
        assert!(email_client.sent().await.is_empty());
    }

    #[tokio::test]
    async fn unverified_user_gets_a_fresh_code() {
        let store = MockUserStore::new();
        let email_client = MockEmailClient::new();
        seed_user(&store, "a@x.com", false).await;

        let use_case = LoginUseCase::new(&store, &email_client, CredentialPolicy::default());
        let outcome = use_case
            .execute(email("a@x.com"), password("password123"), Utc::now())
            .await
            .unwrap();

        assert!(matches!(outcome, LoginOutcome::EmailNotVerified));
        assert_eq!(email_client.sent().await.len(), 1);

        let stored = store.stored(&email("a@x.com")).await.unwrap();
        assert!(stored.pending_verification().is_some());
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_user_read_the_same() {
        let store = MockUserStore::new();
        let email_client = MockEmailClient::new();
        seed_user(&store, "a@x.com", true).await;

        let use_case = LoginUseCase::new(&store, &email_client, CredentialPolicy::default());

        let wrong_password = use_case
            .execute(email("a@x.com"), password("not_the_pw"), Utc::now())
            .await;
        let unknown_user = use_case
            .execute(email("ghost@x.com"), password("password123"), Utc::now())
            .await;

        assert!(matches!(wrong_password, Err(LoginError::InvalidCredentials)));
        assert!(matches!(unknown_user, Err(LoginError::InvalidCredentials)));
    }
}
