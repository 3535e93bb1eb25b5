use secrecy::{ExposeSecret, Secret};

use crate::domain::user::UserError;

const MIN_PASSWORD_LEN: usize = 8;

/// A plaintext password, only ever held transiently between request parsing
/// and hashing inside a store adapter.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl TryFrom<Secret<String>> for Password {
    type Error = UserError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        if value.expose_secret().len() < MIN_PASSWORD_LEN {
            return Err(UserError::InvalidPassword(
                "password must be at least 8 characters long".to_string(),
            ));
        }

        Ok(Self(value))
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}
