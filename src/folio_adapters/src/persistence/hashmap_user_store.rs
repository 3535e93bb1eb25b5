use std::{collections::HashMap, sync::Arc};

use folio_core::{Email, NewUser, Password, User, UserStore, UserStoreError, Username};
use secrecy::Secret;
use tokio::sync::RwLock;

use super::password_hash::{compute_password_hash, verify_password_hash};

struct StoredUser {
    user: User,
    password_hash: Secret<String>,
}

/// In-memory user store, for local development and tests. Clones share the
/// same map via an internal Arc.
#[derive(Clone, Default)]
pub struct HashmapUserStore {
    users: Arc<RwLock<HashMap<Email, StoredUser>>>,
}

impl HashmapUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl UserStore for HashmapUserStore {
    async fn add_user(&self, new_user: NewUser) -> Result<User, UserStoreError> {
        let password_hash = compute_password_hash(new_user.password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;

        if users.contains_key(&new_user.email) {
            return Err(UserStoreError::UserAlreadyExists);
        }
        if users
            .values()
            .any(|stored| stored.user.username() == &new_user.username)
        {
            return Err(UserStoreError::UsernameTaken);
        }

        let user = User::new(new_user.email.clone(), new_user.username);
        users.insert(
            new_user.email,
            StoredUser {
                user: user.clone(),
                password_hash,
            },
        );

        Ok(user)
    }

    async fn get_user(&self, email: &Email) -> Result<User, UserStoreError> {
        self.users
            .read()
            .await
            .get(email)
            .map(|stored| stored.user.clone())
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn save_credential_state(&self, user: &User) -> Result<(), UserStoreError> {
        let mut users = self.users.write().await;
        let stored = users
            .get_mut(user.email())
            .ok_or(UserStoreError::UserNotFound)?;

        stored.user = user.clone();
        Ok(())
    }

    async fn set_new_password(
        &self,
        email: &Email,
        new_password: Password,
    ) -> Result<(), UserStoreError> {
        let password_hash = compute_password_hash(new_password)
            .await
            .map_err(UserStoreError::UnexpectedError)?;

        let mut users = self.users.write().await;
        let stored = users.get_mut(email).ok_or(UserStoreError::UserNotFound)?;

        stored.password_hash = password_hash;
        Ok(())
    }

    async fn authenticate_user(
        &self,
        email: &Email,
        password: &Password,
    ) -> Result<User, UserStoreError> {
        let (user, password_hash) = {
            let users = self.users.read().await;
            let stored = users.get(email).ok_or(UserStoreError::UserNotFound)?;
            (stored.user.clone(), stored.password_hash.clone())
        };

        verify_password_hash(password_hash, password.clone())
            .await
            .map_err(|_| UserStoreError::IncorrectPassword)?;

        Ok(user)
    }

    async fn username_taken(&self, username: &Username) -> Result<bool, UserStoreError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .any(|stored| stored.user.username() == username))
    }
}
