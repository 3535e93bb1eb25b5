pub mod check_username;
pub mod error;
pub mod forgot_password;
pub mod login;
pub mod resend_code;
pub mod reset_password;
pub mod sign_out;
pub mod signup;
pub mod verify_email;

use folio_core::User;
use secrecy::ExposeSecret;
use serde::{Deserialize, Serialize};

pub use check_username::{CheckUsernameRequest, CheckUsernameResponse, check_username};
pub use error::AuthApiError;
pub use forgot_password::{ForgotPasswordRequest, forgot_password};
pub use login::{LoginRequest, login};
pub use resend_code::{ResendCodeRequest, resend_code};
pub use reset_password::{ResetPasswordRequest, reset_password};
pub use sign_out::sign_out;
pub use signup::{SignupRequest, signup};
pub use verify_email::{VerifyEmailRequest, verify_email};

/// The account summary returned by signup, login and verify-email.
#[derive(Debug, Serialize, Deserialize)]
pub struct UserResponse {
    pub email: String,
    pub username: String,
    #[serde(rename = "isEmailVerified")]
    pub is_email_verified: bool,
}

impl From<&User> for UserResponse {
    fn from(user: &User) -> Self {
        Self {
            email: user.email().as_ref().expose_secret().clone(),
            username: user.username().as_str().to_string(),
            is_email_verified: user.is_email_verified(),
        }
    }
}

/// Generic `{ "message": ... }` body for routes that deliberately reveal
/// nothing about account existence.
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}
