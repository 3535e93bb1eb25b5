use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use folio_application::{LoginOutcome, LoginUseCase};
use folio_core::{Email, EmailClient, Password, RateLimiter, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::{auth::generate_auth_cookie, http::AppState};

use super::{UserResponse, error::AuthApiError};

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: Secret<String>,
    pub password: Secret<String>,
}

/// A session cookie is only issued once the email is verified. An unverified
/// account gets a 401 and a fresh code in its inbox.
#[tracing::instrument(name = "Login", skip_all)]
pub async fn login<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    jar: CookieJar,
    Json(request): Json<LoginRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let email = Email::try_from(request.email)?;
    let password = Password::try_from(request.password)?;

    let use_case = LoginUseCase::new(&state.user_store, &state.email_client, state.policy);
    let outcome = use_case.execute(email, password, Utc::now()).await?;

    match outcome {
        LoginOutcome::Authenticated(user) => {
            let auth_cookie = generate_auth_cookie(&user, &state.jwt_config)?;
            let jar = jar.add(auth_cookie.into_owned());

            Ok((jar, (StatusCode::OK, Json(UserResponse::from(&user)))))
        }
        LoginOutcome::EmailNotVerified => Err(AuthApiError::EmailNotVerified),
    }
}
