use askama::Template;
use chrono::{DateTime, Utc};
use folio_core::{
    CredentialPolicy, Email, EmailClient, NewUser, Password, User, UserStore, UserStoreError,
    Username,
};

use crate::emails::{VERIFICATION_EMAIL_SUBJECT, VerificationEmail};

/// Error types for signup use case
#[derive(Debug, thiserror::Error)]
pub enum SignupError {
    #[error("User store error: {0}")]
    UserStoreError(#[from] UserStoreError),
    #[error("Failed to send email: {0}")]
    EmailError(String),
}

/// Signup use case - registers a user, generates the initial verification
/// code, and emails it.
pub struct SignupUseCase<'a, U, E>
where
    U: UserStore,
    E: EmailClient,
{
    user_store: &'a U,
    email_client: &'a E,
    policy: CredentialPolicy,
}

impl<'a, U, E> SignupUseCase<'a, U, E>
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

    /// Execute the signup use case
    ///
    /// Creates the account unverified, then generates and persists the
    /// pending verification code in a second write. A concurrent request for
    /// the same account races on that second write; last write wins.
    #[tracing::instrument(name = "SignupUseCase::execute", skip(self, password, now))]
    pub async fn execute(
        &self,
        email: Email,
        username: Username,
        password: Password,
        now: DateTime<Utc>,
    ) -> Result<User, SignupError> {
        let mut user = self
            .user_store
            .add_user(NewUser::new(email, username, password))
            .await?;

        let code = user.begin_email_verification(now, self.policy.verification_code_ttl);
        self.user_store.save_credential_state(&user).await?;

        let body = VerificationEmail {
            code: code.as_str(),
            expires_in_minutes: self.policy.verification_code_ttl.num_minutes(),
        }
        .render()
        .map_err(|e| SignupError::EmailError(e.to_string()))?;

        self.email_client
            .send_email(user.email(), VERIFICATION_EMAIL_SUBJECT, &body)
            .await
            .map_err(SignupError::EmailError)?;

        Ok(user)
    }
}
