use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::Utc;
use folio_application::VerifyEmailUseCase;
use folio_core::{Email, EmailClient, RateLimiter, UserStore, VerificationCode};
use secrecy::Secret;
use serde::Deserialize;

use crate::{auth::generate_auth_cookie, http::AppState};

use super::{UserResponse, error::AuthApiError};

#[derive(Deserialize)]
pub struct VerifyEmailRequest {
    pub email: Secret<String>,
    pub code: String,
}

/// A successful verification doubles as a login: the response carries a
/// session cookie so the client does not have to round-trip credentials
/// again.
#[tracing::instrument(name = "Verify email", skip_all)]
pub async fn verify_email<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    jar: CookieJar,
    Json(request): Json<VerifyEmailRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let email = Email::try_from(request.email)?;
    let code = VerificationCode::parse(request.code)?;

    let use_case = VerifyEmailUseCase::new(&state.user_store);
    let user = use_case.execute(email, code, Utc::now()).await?;

    let auth_cookie = generate_auth_cookie(&user, &state.jwt_config)?;
    let jar = jar.add(auth_cookie.into_owned());

    Ok((jar, (StatusCode::OK, Json(UserResponse::from(&user)))))
}
