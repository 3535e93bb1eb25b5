pub mod emails;
pub mod use_cases;

pub use use_cases::{
    check_username::CheckUsernameUseCase,
    forgot_password::{ForgotPasswordError, ForgotPasswordUseCase},
    login::{LoginError, LoginOutcome, LoginUseCase},
    resend_code::{ResendCodeError, ResendCodeUseCase},
    reset_password::{ResetPasswordError, ResetPasswordUseCase},
    signup::{SignupError, SignupUseCase},
    verify_email::{VerifyEmailError, VerifyEmailUseCase},
};
