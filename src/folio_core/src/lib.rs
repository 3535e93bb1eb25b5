pub mod domain;
pub mod ports;

// Re-export commonly used types for convenience
pub use domain::{
    email::Email,
    password::Password,
    policy::CredentialPolicy,
    reset_token::ResetToken,
    user::{CredentialError, NewUser, Pending, User, UserError},
    username::Username,
    verification_code::VerificationCode,
};

pub use ports::{
    repositories::{UserStore, UserStoreError},
    services::{EmailClient, RateLimitDecision, RateLimiter, RateLimiterError},
};
