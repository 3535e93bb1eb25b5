use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use folio_application::CheckUsernameUseCase;
use folio_core::{EmailClient, RateLimiter, UserStore, Username};
use serde::{Deserialize, Serialize};

use crate::http::AppState;

use super::error::AuthApiError;

#[derive(Deserialize)]
pub struct CheckUsernameRequest {
    pub username: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CheckUsernameResponse {
    pub available: bool,
}

#[tracing::instrument(name = "Check username", skip_all)]
pub async fn check_username<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    Json(request): Json<CheckUsernameRequest>,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let username = Username::parse(request.username)?;

    let use_case = CheckUsernameUseCase::new(&state.user_store);
    let available = use_case.execute(&username).await?;

    Ok((StatusCode::OK, Json(CheckUsernameResponse { available })))
}
