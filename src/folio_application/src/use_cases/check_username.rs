use folio_core::{UserStore, UserStoreError, Username};

/// Check username use case - reports whether a username is still available.
pub struct CheckUsernameUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> CheckUsernameUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "CheckUsernameUseCase::execute", skip(self))]
    pub async fn execute(&self, username: &Username) -> Result<bool, UserStoreError> {
        Ok(!self.user_store.username_taken(username).await?)
    }
}
