use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode, response::IntoResponse};
use axum_extra::extract::CookieJar;
use folio_core::{EmailClient, RateLimiter, UserStore};

use crate::{auth::create_removal_cookie, http::AppState};

use super::{MessageResponse, error::AuthApiError};

/// Sessions are stateless JWTs, so signing out just removes the cookie.
#[tracing::instrument(name = "Sign out", skip_all)]
pub async fn sign_out<U, E, R>(
    State(state): State<Arc<AppState<U, E, R>>>,
    jar: CookieJar,
) -> Result<impl IntoResponse, AuthApiError>
where
    U: UserStore + 'static,
    E: EmailClient + 'static,
    R: RateLimiter + 'static,
{
    let removal_cookie = create_removal_cookie(&state.jwt_config.jwt_cookie_name).into_owned();
    let jar = jar.add(removal_cookie);

    Ok((
        jar,
        (
            StatusCode::OK,
            Json(MessageResponse {
                message: "Signed out.".to_string(),
            }),
        ),
    ))
}
