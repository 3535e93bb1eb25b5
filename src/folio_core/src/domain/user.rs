use chrono::{DateTime, Duration, Utc};
use thiserror::Error;

use crate::domain::{
    email::Email, password::Password, reset_token::ResetToken, username::Username,
    verification_code::VerificationCode,
};

/// Validation errors for user-supplied fields.
#[derive(Debug, Error, PartialEq)]
pub enum UserError {
    #[error("Please enter a valid email")]
    InvalidEmail,
    #[error("Invalid username: {0}")]
    InvalidUsername(String),
    #[error("Invalid password: {0}")]
    InvalidPassword(String),
    #[error("Verification code must be exactly 6 digits")]
    InvalidVerificationCode,
    #[error("Malformed reset token")]
    InvalidResetToken,
}

/// Outcomes of presenting a code or token against the stored state.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CredentialError {
    #[error("Email is already verified")]
    AlreadyVerified,
    #[error("No pending secret to check against")]
    NotPending,
    #[error("Secret has expired")]
    Expired,
    #[error("Secret does not match")]
    Mismatch,
}

/// A secret paired with its absolute expiry.
///
/// The pair is created and cleared as a unit, so a dangling expiry without a
/// secret (or the reverse) cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending<T> {
    secret: T,
    expires_at: DateTime<Utc>,
}

impl<T> Pending<T> {
    pub fn new(secret: T, expires_at: DateTime<Utc>) -> Self {
        Self { secret, expires_at }
    }

    pub fn secret(&self) -> &T {
        &self.secret
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at < now
    }
}

/// Registration input: the only place a plaintext [`Password`] travels with
/// the rest of the account data. Stores hash it on insert.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub email: Email,
    pub username: Username,
    pub password: Password,
}

impl NewUser {
    pub fn new(email: Email, username: Username, password: Password) -> Self {
        Self {
            email,
            username,
            password,
        }
    }
}

/// The credential-state view of an account.
///
/// The password hash stays inside the store adapters; this type carries the
/// verification and recovery lifecycle: `is_email_verified` moves false->true
/// exactly once, and each pending secret is overwritten by regeneration,
/// consumed by a successful check, or cleared lazily once expired.
#[derive(Debug, Clone)]
pub struct User {
    email: Email,
    username: Username,
    is_email_verified: bool,
    pending_verification: Option<Pending<VerificationCode>>,
    pending_reset: Option<Pending<ResetToken>>,
}

impl User {
    /// A freshly registered, unverified user with no pending secrets.
    pub fn new(email: Email, username: Username) -> Self {
        Self {
            email,
            username,
            is_email_verified: false,
            pending_verification: None,
            pending_reset: None,
        }
    }

    /// Rehydrate a user from persisted columns.
    pub fn from_parts(
        email: Email,
        username: Username,
        is_email_verified: bool,
        pending_verification: Option<Pending<VerificationCode>>,
        pending_reset: Option<Pending<ResetToken>>,
    ) -> Self {
        Self {
            email,
            username,
            is_email_verified,
            pending_verification,
            pending_reset,
        }
    }

    pub fn email(&self) -> &Email {
        &self.email
    }

    pub fn username(&self) -> &Username {
        &self.username
    }

    pub fn is_email_verified(&self) -> bool {
        self.is_email_verified
    }

    pub fn pending_verification(&self) -> Option<&Pending<VerificationCode>> {
        self.pending_verification.as_ref()
    }

    pub fn pending_reset(&self) -> Option<&Pending<ResetToken>> {
        self.pending_reset.as_ref()
    }

    /// Generate a new verification code valid for `ttl`, replacing any
    /// previous one. The caller is responsible for persisting the user.
    pub fn begin_email_verification(
        &mut self,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> VerificationCode {
        let code = VerificationCode::new();
        self.pending_verification = Some(Pending::new(code.clone(), now + ttl));
        code
    }

    /// Check a presented verification code and, on success, mark the email
    /// verified and consume the code.
    ///
    /// An expired code is cleared on the spot (lazy cleanup); the caller must
    /// request a resend.
    pub fn confirm_email(
        &mut self,
        code: &VerificationCode,
        now: DateTime<Utc>,
    ) -> Result<(), CredentialError> {
        if self.is_email_verified {
            return Err(CredentialError::AlreadyVerified);
        }

        let pending = self
            .pending_verification
            .as_ref()
            .ok_or(CredentialError::NotPending)?;

        if pending.is_expired(now) {
            self.pending_verification = None;
            return Err(CredentialError::Expired);
        }

        if pending.secret() != code {
            return Err(CredentialError::Mismatch);
        }

        self.is_email_verified = true;
        self.pending_verification = None;
        Ok(())
    }

    /// Generate a new reset token valid for `ttl`, replacing any previous
    /// one. The caller is responsible for persisting the user.
    pub fn begin_password_reset(&mut self, now: DateTime<Utc>, ttl: Duration) -> ResetToken {
        let token = ResetToken::new();
        self.pending_reset = Some(Pending::new(token.clone(), now + ttl));
        token
    }

    /// Check a presented reset token and consume it on success. The caller
    /// performs the actual password replacement.
    pub fn consume_reset_token(
        &mut self,
        token: &ResetToken,
        now: DateTime<Utc>,
    ) -> Result<(), CredentialError> {
        let pending = self
            .pending_reset
            .as_ref()
            .ok_or(CredentialError::NotPending)?;

        if pending.is_expired(now) {
            self.pending_reset = None;
            return Err(CredentialError::Expired);
        }

        if pending.secret() != token {
            return Err(CredentialError::Mismatch);
        }

        self.pending_reset = None;
        Ok(())
    }

    /// Drop any expired pending secrets. Returns true if state changed, so
    /// callers know a save is warranted.
    pub fn cleanup_expired(&mut self, now: DateTime<Utc>) -> bool {
        let mut changed = false;

        if self
            .pending_verification
            .as_ref()
            .is_some_and(|p| p.is_expired(now))
        {
            self.pending_verification = None;
            changed = true;
        }

        if self
            .pending_reset
            .as_ref()
            .is_some_and(|p| p.is_expired(now))
        {
            self.pending_reset = None;
            changed = true;
        }

        changed
    }
}
