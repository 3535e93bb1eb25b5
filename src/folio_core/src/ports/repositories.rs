use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::Password,
    user::{NewUser, User},
    username::Username,
};

// UserStore port trait and errors
#[derive(Debug, Error)]
pub enum UserStoreError {
    #[error("Email is already registered")]
    UserAlreadyExists,
    #[error("Username is already taken")]
    UsernameTaken,
    #[error("User not found")]
    UserNotFound,
    #[error("Incorrect password")]
    IncorrectPassword,
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

impl PartialEq for UserStoreError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::UserAlreadyExists, Self::UserAlreadyExists) => true,
            (Self::UsernameTaken, Self::UsernameTaken) => true,
            (Self::UserNotFound, Self::UserNotFound) => true,
            (Self::IncorrectPassword, Self::IncorrectPassword) => true,
            (Self::UnexpectedError(_), Self::UnexpectedError(_)) => true,
            _ => false,
        }
    }
}

/// Persistence port for user accounts.
///
/// The plaintext password enters the store exactly twice (`add_user`,
/// `set_new_password`) and is hashed before it is written; everything else
/// works on the credential-state view. `save_credential_state` persists the
/// verification/reset fields of an already-registered user; between a
/// `begin_*` call and the save, last write wins (no optimistic locking).
#[async_trait]
pub trait UserStore: Send + Sync {
    async fn add_user(&self, new_user: NewUser) -> Result<User, UserStoreError>;
    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError>;
    async fn save_credential_state(&self, user: &User) -> Result<(), UserStoreError>;
    async fn set_new_password(
        &self,
        email: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError>;
    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError>;
    async fn username_taken(&self, username: &Username) -> Result<bool, UserStoreError>;
}
