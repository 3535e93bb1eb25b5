use folio_core::{CredentialPolicy, EmailClient, RateLimiter, UserStore};

use crate::auth::JwtAuthConfig;

/// Shared state handed to every route. The stores are cheap to clone (Arc
/// internally) but the state itself is wrapped in an Arc by the router, so
/// handlers borrow from a single instance.
pub struct AppState<U, E, R>
where
    U: UserStore,
    E: EmailClient,
    R: RateLimiter,
{
    pub user_store: U,
    pub email_client: E,
    pub rate_limiter: R,
    pub jwt_config: JwtAuthConfig,
    pub policy: CredentialPolicy,
}

impl<U, E, R> AppState<U, E, R>
where
    U: UserStore,
    E: EmailClient,
    R: RateLimiter,
{
    pub fn new(
        user_store: U,
        email_client: E,
        rate_limiter: R,
        jwt_config: JwtAuthConfig,
        policy: CredentialPolicy,
    ) -> Self {
        Self {
            user_store,
            email_client,
            rate_limiter,
            jwt_config,
            policy,
        }
    }
}
