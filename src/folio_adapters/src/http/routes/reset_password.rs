use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use folio_application::ResetPasswordUseCase;
use folio_core::{Email, EmailClient, Password, RateLimiter, ResetToken, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::AppState;

use super::{MessageResponse, error::AuthApiError};

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    pub email: Secret<String>,
    pub token: String,
    #[serde(rename = "newPassword")]
    pub new_password: Secret<String>,
}

#[tracing::instrument(name = "Reset password", skip_all)]
pub async fn reset_password<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let email = Email::try_from(request.email)?;
    let token = ResetToken::parse(request.token)?;
    let new_password = Password::try_from(request.new_password)?;

    let use_case = ResetPasswordUseCase::new(&state.user_store);
    use_case
        .execute(email, token, new_password, Utc::now())
        .await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "Password has been reset. You can now log in.".to_string(),
        }),
    ))
}
