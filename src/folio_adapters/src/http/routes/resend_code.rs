use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use folio_application::ResendCodeUseCase;
use folio_core::{Email, EmailClient, RateLimiter, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::AppState;

use super::{MessageResponse, error::AuthApiError};

#[derive(Deserialize)]
pub struct ResendCodeRequest {
    pub email: Secret<String>,
}

/// Replies with the same message whether or not the account exists.
#[tracing::instrument(name = "Resend verification code", skip_all)]
pub async fn resend_code<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    Json(request): Json<ResendCodeRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case = ResendCodeUseCase::new(
        &state.user_store,
        &state.email_client,
        &state.rate_limiter,
        state.policy,
    );
    use_case.execute(email, Utc::now()).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "If the account needs verification, a new code has been sent.".to_string(),
        }),
    ))
}
