use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use folio_application::SignupUseCase;
use folio_core::{Email, EmailClient, Password, RateLimiter, UserStore, Username};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::AppState;

use super::{UserResponse, error::AuthApiError};

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: Secret<String>,
    pub username: String,
    pub password: Secret<String>,
}

#[tracing::instrument(name = "Signup", skip_all)]
pub async fn signup<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    Json(request): Json<SignupRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let email = Email::try_from(request.email)?;
    let username = Username::parse(request.username)?;
    let password = Password::try_from(request.password)?;

    let use_case = SignupUseCase::new(&state.user_store, &state.email_client, state.policy);
    let user = use_case
        .execute(email, username, password, Utc::now())
        .await?;

    Ok((StatusCode::CREATED, Json(UserResponse::from(&user))))
}
