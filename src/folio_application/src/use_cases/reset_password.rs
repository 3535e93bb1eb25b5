use chrono::{DateTime, Utc};
use folio_core::{CredentialError, Email, Password, ResetToken, UserStore, UserStoreError};

/// Error types for reset password use case
#[derive(Debug, thiserror::Error)]
pub enum ResetPasswordError {
    /// Covers unknown account, wrong token, consumed token, and expired
    /// token, so the response never confirms whether the account exists.
    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,
    #[error("User store error: {0}")]
    UserStoreError(UserStoreError),
}

/// Reset password use case - consumes a valid reset token and replaces the
/// password.
///
/// The password write and the token-clearing write are separate store calls;
/// there is no transaction spanning them (documented limitation inherited
/// from the request-per-read-modify-write model).
pub struct ResetPasswordUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> ResetPasswordUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "ResetPasswordUseCase::execute", skip(self, token, new_password, now))]
    pub async fn execute(
        &self,
        email: Email,
        token: ResetToken,
        new_password: Password,
        now: DateTime<Utc>,
    ) -> Result<(), ResetPasswordError> {
        let mut user = match self.user_store.get_user(&email).await {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => {
                return Err(ResetPasswordError::InvalidOrExpiredToken);
            }
            Err(e) => return Err(ResetPasswordError::UserStoreError(e)),
        };

        let cleaned = user.cleanup_expired(now);

        match user.consume_reset_token(&token, now) {
            Ok(()) => {
                self.user_store
                    .set_new_password(&email, new_password)
                    .await
                    .map_err(ResetPasswordError::UserStoreError)?;
                self.user_store
                    .save_credential_state(&user)
                    .await
                    .map_err(ResetPasswordError::UserStoreError)?;
                Ok(())
            }
            Err(err) => {
                if cleaned || err == CredentialError::Expired {
                    self.user_store
                        .save_credential_state(&user)
                        .await
                        .map_err(ResetPasswordError::UserStoreError)?;
                }
                Err(ResetPasswordError::InvalidOrExpiredToken)
            }
        }
    }
}
