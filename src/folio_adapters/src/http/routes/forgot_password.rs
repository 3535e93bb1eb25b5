use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use chrono::Utc;
use folio_application::ForgotPasswordUseCase;
use folio_core::{Email, EmailClient, RateLimiter, UserStore};
use secrecy::Secret;
use serde::Deserialize;

use crate::http::AppState;

use super::{MessageResponse, error::AuthApiError};

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: Secret<String>,
}

/// Replies with the same message whether or not the account exists.
#[tracing::instrument(name = "Forgot password", skip_all)]
pub async fn forgot_password<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    Json(request): Json<ForgotPasswordRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let email = Email::try_from(request.email)?;

    let use_case = ForgotPasswordUseCase::new(
        &state.user_store,
        &state.email_client,
        &state.rate_limiter,
        state.policy,
    );
    use_case.execute(email, Utc::now()).await?;

    Ok((
        StatusCode::OK,
        Json(MessageResponse {
            message: "If an account with that email exists, a reset email has been sent."
                .to_string(),
        }),
    ))
}
