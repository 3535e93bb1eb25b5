use axum::{
    Json,
    http::{StatusCode, header},
    response::{IntoResponse, Response},
};
use folio_application::{
    ForgotPasswordError, LoginError, ResendCodeError, ResetPasswordError, SignupError,
    VerifyEmailError,
};
use folio_core::{RateLimiterError, UserError, UserStoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::auth::TokenAuthError;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    #[serde(rename = "retryAfterSeconds", skip_serializing_if = "Option::is_none")]
    pub retry_after_seconds: Option<u64>,
}

#[derive(Debug, Error)]
pub enum AuthApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Invalid email or password")]
    InvalidCredentials,

    #[error("Email not verified. A new verification code has been sent.")]
    EmailNotVerified,

    #[error("Invalid or expired verification code")]
    InvalidOrExpiredCode,

    #[error("Invalid or expired reset token")]
    InvalidOrExpiredToken,

    #[error("Email is already registered")]
    UserAlreadyExists,

    #[error("Username is already taken")]
    UsernameTaken,

    #[error("Too many attempts. Please try again later.")]
    RateLimited { retry_after_seconds: u64 },

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status_code, retry_after_seconds) = match self {
            AuthApiError::InvalidInput(_) => (StatusCode::BAD_REQUEST, None),

            AuthApiError::InvalidCredentials
            | AuthApiError::EmailNotVerified
            | AuthApiError::InvalidOrExpiredCode
            | AuthApiError::InvalidOrExpiredToken => (StatusCode::UNAUTHORIZED, None),

            AuthApiError::UserAlreadyExists | AuthApiError::UsernameTaken => {
                (StatusCode::CONFLICT, None)
            }

            AuthApiError::RateLimited {
                retry_after_seconds,
            } => (StatusCode::TOO_MANY_REQUESTS, Some(retry_after_seconds)),

            AuthApiError::UnexpectedError(_) => (StatusCode::INTERNAL_SERVER_ERROR, None),
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
            retry_after_seconds,
        });

        match retry_after_seconds {
            Some(seconds) => (
                status_code,
                [(header::RETRY_AFTER, seconds.to_string())],
                body,
            )
                .into_response(),
            None => (status_code, body).into_response(),
        }
    }
}

impl From<UserError> for AuthApiError {
    fn from(error: UserError) -> Self {
        AuthApiError::InvalidInput(error.to_string())
    }
}

impl From<UserStoreError> for AuthApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserAlreadyExists => AuthApiError::UserAlreadyExists,
            UserStoreError::UsernameTaken => AuthApiError::UsernameTaken,
            UserStoreError::IncorrectPassword | UserStoreError::UserNotFound => {
                AuthApiError::InvalidCredentials
            }
            UserStoreError::UnexpectedError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<RateLimiterError> for AuthApiError {
    fn from(error: RateLimiterError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<TokenAuthError> for AuthApiError {
    fn from(error: TokenAuthError) -> Self {
        AuthApiError::UnexpectedError(error.to_string())
    }
}

impl From<SignupError> for AuthApiError {
    fn from(error: SignupError) -> Self {
        match error {
            SignupError::UserStoreError(e) => e.into(),
            SignupError::EmailError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<LoginError> for AuthApiError {
    fn from(error: LoginError) -> Self {
        match error {
            LoginError::InvalidCredentials => AuthApiError::InvalidCredentials,
            LoginError::UserStoreError(e) => e.into(),
            LoginError::EmailError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<VerifyEmailError> for AuthApiError {
    fn from(error: VerifyEmailError) -> Self {
        match error {
            // Verifying an already verified account reveals nothing beyond
            // what a bad code does.
            VerifyEmailError::InvalidOrExpiredCode | VerifyEmailError::AlreadyVerified => {
                AuthApiError::InvalidOrExpiredCode
            }
            VerifyEmailError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<ResendCodeError> for AuthApiError {
    fn from(error: ResendCodeError) -> Self {
        match error {
            ResendCodeError::RateLimited {
                retry_after_seconds,
            } => AuthApiError::RateLimited {
                retry_after_seconds,
            },
            ResendCodeError::RateLimiterError(e) => e.into(),
            ResendCodeError::UserStoreError(e) => e.into(),
            ResendCodeError::EmailError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<ForgotPasswordError> for AuthApiError {
    fn from(error: ForgotPasswordError) -> Self {
        match error {
            ForgotPasswordError::RateLimited {
                retry_after_seconds,
            } => AuthApiError::RateLimited {
                retry_after_seconds,
            },
            ForgotPasswordError::RateLimiterError(e) => e.into(),
            ForgotPasswordError::UserStoreError(e) => e.into(),
            ForgotPasswordError::EmailError(e) => AuthApiError::UnexpectedError(e),
        }
    }
}

impl From<ResetPasswordError> for AuthApiError {
    fn from(error: ResetPasswordError) -> Self {
        match error {
            ResetPasswordError::InvalidOrExpiredToken => AuthApiError::InvalidOrExpiredToken,
            ResetPasswordError::UserStoreError(e) => e.into(),
        }
    }
}
