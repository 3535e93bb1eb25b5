use std::fmt;

use rand::Rng;
use subtle::ConstantTimeEq;

use crate::domain::user::UserError;

const CODE_LEN: usize = 6;

/// A 6-digit numeric email-verification code.
#[derive(Clone)]
pub struct VerificationCode(String);

impl VerificationCode {
    /// Generate a fresh random code in the range 100000-999999.
    pub fn new() -> Self {
        let code = rand::rng().random_range(100_000..=999_999u32);
        Self(code.to_string())
    }

    pub fn parse(input: String) -> Result<Self, UserError> {
        let trimmed = input.trim();

        if trimmed.len() != CODE_LEN || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
            return Err(UserError::InvalidVerificationCode);
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for VerificationCode {
    fn default() -> Self {
        Self::new()
    }
}

// Constant-time comparison; equal lengths are guaranteed by construction.
impl PartialEq for VerificationCode {
    fn eq(&self, other: &Self) -> bool {
        self.0.as_bytes().ct_eq(other.0.as_bytes()).into()
    }
}

impl Eq for VerificationCode {}

// Keep the code itself out of debug output.
impl fmt::Debug for VerificationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VerificationCode(..)")
    }
}
